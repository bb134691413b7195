use std::collections::{BTreeMap, HashMap};

use crate::config::{FieldSpec, PipelineConfig};

use super::model::{FilteredRecord, PlayerYearAggregate, StatField, YearIndex};

// ---------------------------------------------------------------------------
// Grouping: year → player → stints, in first-appearance order
// ---------------------------------------------------------------------------

/// Stints of one year, players kept in order of first appearance.
#[derive(Default)]
struct YearGroup {
    players: Vec<(String, Vec<FilteredRecord>)>,
    position: HashMap<String, usize>,
}

impl YearGroup {
    fn push(&mut self, record: FilteredRecord) {
        match self.position.get(&record.player) {
            Some(&i) => self.players[i].1.push(record),
            None => {
                self.position.insert(record.player.clone(), self.players.len());
                self.players.push((record.player.clone(), vec![record]));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// YearPlayerAggregator
// ---------------------------------------------------------------------------

/// Collapses season stints into one complete record per (year, player).
#[derive(Debug, Clone)]
pub struct YearPlayerAggregator<'a> {
    fields: &'a [FieldSpec],
}

/// What an aggregation run kept and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateSummary {
    pub groups: usize,
    pub incomplete: usize,
    pub empty_years: usize,
}

impl<'a> YearPlayerAggregator<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        YearPlayerAggregator {
            fields: &config.fields,
        }
    }

    pub fn aggregate(&self, records: impl IntoIterator<Item = FilteredRecord>) -> YearIndex {
        self.aggregate_with_summary(records).0
    }

    pub fn aggregate_with_summary(
        &self,
        records: impl IntoIterator<Item = FilteredRecord>,
    ) -> (YearIndex, AggregateSummary) {
        let grouped = records
            .into_iter()
            .fold(BTreeMap::<i32, YearGroup>::new(), |mut acc, record| {
                acc.entry(record.year).or_default().push(record);
                acc
            });

        let mut summary = AggregateSummary::default();
        let mut complete = Vec::with_capacity(grouped.len());
        for (year, group) in grouped {
            let mut players = Vec::with_capacity(group.players.len());
            for (player, stints) in group.players {
                summary.groups += 1;
                match self.roll_up(year, player, &stints) {
                    Some(aggregate) => players.push(aggregate),
                    None => summary.incomplete += 1,
                }
            }
            if players.is_empty() {
                log::debug!("Year {year} has no complete player seasons; omitted");
                summary.empty_years += 1;
                continue;
            }
            complete.push((year, players));
        }

        (YearIndex::from_groups(complete), summary)
    }

    /// Roll one player's stints into an aggregate, or `None` if any
    /// configured field comes out null.
    fn roll_up(
        &self,
        year: i32,
        player: String,
        stints: &[FilteredRecord],
    ) -> Option<PlayerYearAggregate> {
        let stats = self
            .fields
            .iter()
            .map(|spec| {
                let values: Vec<Option<f64>> = stints
                    .iter()
                    .map(|r| r.stats.get(&spec.field).copied().flatten())
                    .collect();
                spec.rollup.apply(&values).map(|v| (spec.field, v))
            })
            .collect::<Option<BTreeMap<StatField, f64>>>();

        let Some(stats) = stats else {
            log::debug!("Dropping incomplete season {year} for {player}");
            return None;
        };
        Some(PlayerYearAggregate {
            year,
            player,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;

    fn record(year: i32, player: &str, stats: &[(StatField, Option<f64>)]) -> FilteredRecord {
        FilteredRecord {
            year,
            player: player.to_string(),
            stats: stats.iter().copied().collect(),
        }
    }

    fn full(year: i32, player: &str, three_pct: Option<f64>, minutes: f64) -> FilteredRecord {
        record(
            year,
            player,
            &[
                (StatField::Age, Some(25.0)),
                (StatField::ThreePct, three_pct),
                (StatField::ThreeAttempts, Some(150.0)),
                (StatField::TwoPct, Some(0.5)),
                (StatField::TwoAttempts, Some(150.0)),
                (StatField::TrueShooting, Some(0.55)),
                (StatField::Minutes, Some(minutes)),
            ],
        )
    }

    #[test]
    fn keeps_first_appearance_order_within_year() {
        let config = Preset::SplitAttempts100.config();
        let index = YearPlayerAggregator::new(&config).aggregate(vec![
            full(2001, "Zed", Some(0.3), 100.0),
            full(2001, "Amy", Some(0.3), 100.0),
            full(2001, "Zed", Some(0.3), 100.0),
            full(2000, "Bob", Some(0.3), 100.0),
        ]);
        let names: Vec<_> = index
            .get(2001)
            .unwrap()
            .iter()
            .map(|a| a.player.as_str())
            .collect();
        assert_eq!(names, vec!["Zed", "Amy"]);
        assert_eq!(index.years().collect::<Vec<_>>(), vec![2000, 2001]);
    }

    #[test]
    fn first_rollup_uses_earliest_stint() {
        let config = Preset::SplitAttempts100.config();
        let mut later = full(2001, "A", Some(0.3), 100.0);
        later.stats.insert(StatField::Age, Some(26.0));
        let index = YearPlayerAggregator::new(&config)
            .aggregate(vec![full(2001, "A", Some(0.3), 100.0), later]);
        assert_eq!(index.get(2001).unwrap()[0].stat(StatField::Age), Some(25.0));
    }

    #[test]
    fn incomplete_player_is_dropped_but_year_survives() {
        let config = Preset::SplitAttempts100.config();
        let (index, summary) = YearPlayerAggregator::new(&config).aggregate_with_summary(vec![
            full(2001, "A", None, 100.0),
            full(2001, "B", Some(0.4), 100.0),
        ]);
        let players = index.get(2001).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].player, "B");
        assert_eq!(
            summary,
            AggregateSummary {
                groups: 2,
                incomplete: 1,
                empty_years: 0
            }
        );
    }

    #[test]
    fn one_null_stint_taints_the_season() {
        let config = Preset::SplitAttempts100.config();
        let index = YearPlayerAggregator::new(&config).aggregate(vec![
            full(2001, "A", Some(0.4), 100.0),
            full(2001, "A", None, 100.0),
        ]);
        assert!(index.is_empty());
    }

    #[test]
    fn missing_configured_field_counts_as_null() {
        let config = Preset::SplitAttempts100.config();
        let index = YearPlayerAggregator::new(&config)
            .aggregate(vec![record(2001, "A", &[(StatField::TwoPct, Some(0.5))])]);
        assert!(index.get(2001).is_none());
    }

    #[test]
    fn empty_input_gives_empty_index() {
        let config = PipelineConfig::default();
        let index = YearPlayerAggregator::new(&config).aggregate(Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.bounds(), None);
    }
}
