/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///   Seasons_Stats.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<RawRow>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  attempt threshold + typing → FilteredRecord
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  year → player rollups, completeness → YearIndex
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;

use crate::config::PipelineConfig;

use aggregate::YearPlayerAggregator;
use filter::RowFilter;
use model::{RawRow, YearIndex};

/// Run the full pipeline over loaded rows.
pub fn build_index(rows: &[RawRow], config: &PipelineConfig) -> YearIndex {
    let (records, rejected) = RowFilter::new(config).filter_all(rows);
    log::debug!(
        "Accepted {} of {} rows; rejected {:?}",
        records.len(),
        rows.len(),
        rejected.iter().collect::<Vec<_>>()
    );

    let (index, summary) = YearPlayerAggregator::new(config).aggregate_with_summary(records);
    log::debug!(
        "{} player seasons, {} incomplete, {} empty years",
        summary.groups,
        summary.incomplete,
        summary.empty_years
    );
    log::info!(
        "Built index: {} years, {} player seasons, bounds {:?}",
        index.len(),
        index.aggregate_count(),
        index.bounds()
    );
    index
}
