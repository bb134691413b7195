use std::collections::BTreeMap;

use crate::config::{AttemptGate, PipelineConfig};

use super::model::{FilteredRecord, RawRow};

// ---------------------------------------------------------------------------
// Rejection – why a row never enters the pipeline
// ---------------------------------------------------------------------------

/// Reason a row was excluded. Rejections are expected and never surfaced as
/// failures; they only feed debug tallies.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("attempt column {column} is missing or not a number")]
    MissingAttempts { column: String },

    #[error("{column} = {value} is below the minimum of {minimum}")]
    BelowThreshold {
        column: String,
        value: f64,
        minimum: f64,
    },

    #[error("year cell {0:?} is not a whole number")]
    InvalidYear(String),

    #[error("player name is empty")]
    MissingPlayer,

    #[error("statistic column {column} holds non-numeric text {value:?}")]
    Malformed { column: String, value: String },
}

impl Rejection {
    /// Short stable key for tallying.
    pub fn kind(&self) -> &'static str {
        match self {
            Rejection::MissingAttempts { .. } => "missing_attempts",
            Rejection::BelowThreshold { .. } => "below_threshold",
            Rejection::InvalidYear(_) => "invalid_year",
            Rejection::MissingPlayer => "missing_player",
            Rejection::Malformed { .. } => "malformed",
        }
    }
}

/// Rejection counts by [`Rejection::kind`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RejectionTally {
    counts: BTreeMap<&'static str, usize>,
}

impl RejectionTally {
    pub fn record(&mut self, reason: &Rejection) {
        log::trace!("Rejected row: {reason}");
        *self.counts.entry(reason.kind()).or_default() += 1;
    }

    pub fn count(&self, kind: &str) -> usize {
        self.counts.get(kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.counts.iter().map(|(k, n)| (*k, *n))
    }
}

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

/// A non-empty cell that is not a finite number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cell is not a number")]
pub struct NotNumeric;

/// Parse one statistic cell: empty → `Ok(None)`, number → `Ok(Some(_))`.
pub fn parse_cell(cell: &str) -> Result<Option<f64>, NotNumeric> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(NotNumeric),
    }
}

fn parse_year(cell: &str) -> Option<i32> {
    let value = cell.trim().parse::<f64>().ok()?;
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value < i32::MIN as f64 || value > i32::MAX as f64 {
        return None;
    }
    Some(value as i32)
}

// ---------------------------------------------------------------------------
// RowFilter
// ---------------------------------------------------------------------------

/// Turns raw CSV rows into typed records, dropping ineligible rows.
#[derive(Debug, Clone)]
pub struct RowFilter<'a> {
    config: &'a PipelineConfig,
}

impl<'a> RowFilter<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        RowFilter { config }
    }

    /// Accept `row` as a typed record, or drop it.
    pub fn filter(&self, row: &RawRow) -> Option<FilteredRecord> {
        self.filter_tallied(row, &mut RejectionTally::default())
    }

    /// Filter every row in order, counting the rejected ones.
    pub fn filter_all(&self, rows: &[RawRow]) -> (Vec<FilteredRecord>, RejectionTally) {
        let mut tally = RejectionTally::default();
        let records = rows
            .iter()
            .filter_map(|row| self.filter_tallied(row, &mut tally))
            .collect();
        (records, tally)
    }

    fn filter_tallied(&self, row: &RawRow, tally: &mut RejectionTally) -> Option<FilteredRecord> {
        match self.evaluate(row) {
            Ok(record) => Some(record),
            Err(reason) => {
                tally.record(&reason);
                None
            }
        }
    }

    /// Like [`filter`](Self::filter) but reports why a row was dropped.
    pub fn evaluate(&self, row: &RawRow) -> Result<FilteredRecord, Rejection> {
        for AttemptGate { column, minimum } in self.config.attempt_gates() {
            let value = row
                .get(column)
                .and_then(|cell| parse_cell(cell).ok().flatten())
                .ok_or_else(|| Rejection::MissingAttempts {
                    column: column.to_string(),
                })?;
            if value < minimum {
                return Err(Rejection::BelowThreshold {
                    column: column.to_string(),
                    value,
                    minimum,
                });
            }
        }

        let columns = &self.config.columns;
        let year_cell = row.get(&columns.year).map(String::as_str).unwrap_or("");
        let year =
            parse_year(year_cell).ok_or_else(|| Rejection::InvalidYear(year_cell.to_string()))?;

        let player = row
            .get(&columns.player)
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .ok_or(Rejection::MissingPlayer)?
            .to_string();

        let mut stats = BTreeMap::new();
        for spec in &self.config.fields {
            // An absent column reads as an empty cell.
            let cell = row.get(&spec.column).map(String::as_str).unwrap_or("");
            let value = parse_cell(cell).map_err(|NotNumeric| Rejection::Malformed {
                column: spec.column.clone(),
                value: cell.to_string(),
            })?;
            stats.insert(spec.field, value);
        }

        Ok(FilteredRecord {
            year,
            player,
            stats,
        })
    }
}
