use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RawRow – one CSV record as delivered by the loader
// ---------------------------------------------------------------------------

/// One player-season-team record: column name → cell text.
pub type RawRow = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// StatField – the statistics the viewer knows how to roll up
// ---------------------------------------------------------------------------

/// A statistic column that can be carried through the pipeline.
///
/// `Ord` so the field can key a `BTreeMap` in records and aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatField {
    Age,
    TwoPct,
    TwoAttempts,
    ThreePct,
    ThreeAttempts,
    TrueShooting,
    Minutes,
    FieldGoalAttempts,
}

impl StatField {
    /// Column name used by the Basketball-Reference season export.
    pub fn default_column(self) -> &'static str {
        match self {
            StatField::Age => "Age",
            StatField::TwoPct => "2P%",
            StatField::TwoAttempts => "2PA",
            StatField::ThreePct => "3P%",
            StatField::ThreeAttempts => "3PA",
            StatField::TrueShooting => "TS%",
            StatField::Minutes => "MP",
            StatField::FieldGoalAttempts => "FGA",
        }
    }

    /// Human label for tooltips.
    pub fn label(self) -> &'static str {
        match self {
            StatField::Age => "Age",
            StatField::TwoPct => "2P%",
            StatField::TwoAttempts => "2PA",
            StatField::ThreePct => "3P%",
            StatField::ThreeAttempts => "3PA",
            StatField::TrueShooting => "TS%",
            StatField::Minutes => "Minutes Played",
            StatField::FieldGoalAttempts => "FGA",
        }
    }

    /// Rate fields are formatted through the configured [`PercentScale`](crate::config::PercentScale).
    pub fn is_percentage(self) -> bool {
        matches!(
            self,
            StatField::TwoPct | StatField::ThreePct | StatField::TrueShooting
        )
    }
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Rollup – how stints within one season collapse into one value
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rollup {
    /// Arithmetic mean, for rates and percentages.
    Mean,
    /// Arithmetic sum, for counts.
    Sum,
    /// Value of the first stint in input order.
    First,
}

impl Rollup {
    /// Combine the per-stint values of one field.
    ///
    /// `Mean` and `Sum` return `None` when any stint is null, and `First`
    /// returns whatever the first stint holds. An empty slice yields `None`.
    pub fn apply(self, values: &[Option<f64>]) -> Option<f64> {
        match self {
            Rollup::First => values.first().copied().flatten(),
            Rollup::Sum => {
                if values.is_empty() {
                    return None;
                }
                values.iter().copied().sum::<Option<f64>>()
            }
            Rollup::Mean => {
                if values.is_empty() {
                    return None;
                }
                let total = values.iter().copied().sum::<Option<f64>>()?;
                Some(total / values.len() as f64)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// FilteredRecord – an accepted row, typed but possibly with null stats
// ---------------------------------------------------------------------------

/// A row that passed the attempt threshold.
///
/// `stats` holds one entry per configured field; `None` marks an empty cell.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredRecord {
    pub year: i32,
    pub player: String,
    pub stats: BTreeMap<StatField, Option<f64>>,
}

// ---------------------------------------------------------------------------
// PlayerYearAggregate – one player's season after rollup
// ---------------------------------------------------------------------------

/// One player's rolled-up season. Every configured field has a value.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerYearAggregate {
    pub year: i32,
    pub player: String,
    pub stats: BTreeMap<StatField, f64>,
}

impl PlayerYearAggregate {
    /// Value of `field`, or `None` if the field is not part of the active config.
    pub fn stat(&self, field: StatField) -> Option<f64> {
        self.stats.get(&field).copied()
    }
}

/// Min and max of `field` across `aggregates`.
pub fn extent(aggregates: &[PlayerYearAggregate], field: StatField) -> Option<(f64, f64)> {
    aggregates
        .iter()
        .filter_map(|a| a.stat(field))
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

// ---------------------------------------------------------------------------
// YearIndex – the immutable year → players map handed to the viewer
// ---------------------------------------------------------------------------

/// Complete player seasons keyed by year, ascending.
///
/// Every key maps to a non-empty list; years without a complete player are
/// absent. Only the aggregator builds a populated index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearIndex {
    years: BTreeMap<i32, Vec<PlayerYearAggregate>>,
}

impl YearIndex {
    /// Build from already-filtered groups. Empty groups are skipped.
    pub(crate) fn from_groups(groups: impl IntoIterator<Item = (i32, Vec<PlayerYearAggregate>)>) -> Self {
        let years = groups
            .into_iter()
            .filter(|(_, players)| !players.is_empty())
            .collect();
        YearIndex { years }
    }

    pub fn get(&self, year: i32) -> Option<&[PlayerYearAggregate]> {
        self.years.get(&year).map(Vec::as_slice)
    }

    /// Present years, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    /// `(min_year, max_year)`, or `None` for an empty index.
    pub fn bounds(&self) -> Option<(i32, i32)> {
        let first = self.years.keys().next()?;
        let last = self.years.keys().next_back()?;
        Some((*first, *last))
    }

    /// The present year closest to `year`; ties go to the earlier year.
    pub fn nearest_year(&self, year: i32) -> Option<i32> {
        if self.years.contains_key(&year) {
            return Some(year);
        }
        let below = self.years.range(..year).next_back().map(|(y, _)| *y);
        let above = self.years.range(year..).next().map(|(y, _)| *y);
        match (below, above) {
            (Some(b), Some(a)) => {
                if (year - b) <= (a - year) {
                    Some(b)
                } else {
                    Some(a)
                }
            }
            (b, a) => b.or(a),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, &[PlayerYearAggregate])> + '_ {
        self.years.iter().map(|(y, players)| (*y, players.as_slice()))
    }

    /// Number of years.
    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Total player seasons across all years.
    pub fn aggregate_count(&self) -> usize {
        self.years.values().map(Vec::len).sum()
    }
}
