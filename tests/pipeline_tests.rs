use rstest::rstest;
use shot_scatter::config::{FieldSpec, KeyColumns, PipelineConfig, Preset, Threshold};
use shot_scatter::data::aggregate::YearPlayerAggregator;
use shot_scatter::data::build_index;
use shot_scatter::data::filter::RowFilter;
use shot_scatter::data::model::{RawRow, Rollup, StatField};

// --- HELPERS ---

#[allow(clippy::too_many_arguments)]
fn stint(
    year: &str,
    player: &str,
    three_att: &str,
    two_att: &str,
    three_pct: &str,
    two_pct: &str,
    ts: &str,
    minutes: &str,
) -> RawRow {
    [
        ("Year", year),
        ("Player", player),
        ("Age", "27"),
        ("3PA", three_att),
        ("2PA", two_att),
        ("3P%", three_pct),
        ("2P%", two_pct),
        ("TS%", ts),
        ("MP", minutes),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// --- SCENARIOS ---

#[test]
fn test_two_stints_roll_up_into_one_season() {
    let rows = vec![
        stint("2005", "A", "150", "150", "0.40", "0.50", "0.55", "2000"),
        stint("2005", "A", "50", "200", "0.30", "0.45", "0.50", "500"),
    ];
    let config = PipelineConfig::default();

    // The second stint alone would miss the 3PA threshold.
    assert!(RowFilter::new(&config).filter(&rows[1]).is_none());

    let mut qualifying = rows.clone();
    qualifying[1].insert("3PA".into(), "100".into());
    let index = build_index(&qualifying, &config);
    let a = &index.get(2005).unwrap()[0];
    assert_eq!(a.player, "A");
    assert_eq!(a.stat(StatField::ThreeAttempts), Some(250.0));
    assert!(close(a.stat(StatField::ThreePct).unwrap(), 0.35));
    assert_eq!(a.stat(StatField::Minutes), Some(2500.0));
    assert_eq!(a.stat(StatField::TwoAttempts), Some(350.0));
}

#[test]
fn test_stint_sums_without_threshold_interference() {
    // Both stints typed directly, bypassing the row threshold.
    let config = PipelineConfig::default();
    let permissive = PipelineConfig {
        threshold: Threshold::split(0.0, 0.0),
        ..config
    };
    let rows = [
        stint("2005", "A", "150", "150", "0.40", "0.50", "0.55", "2000"),
        stint("2005", "A", "50", "200", "0.30", "0.45", "0.50", "500"),
    ];
    let filter = RowFilter::new(&permissive);
    let records: Vec<_> = rows.iter().filter_map(|r| filter.filter(r)).collect();
    let index = YearPlayerAggregator::new(&permissive).aggregate(records);

    let a = &index.get(2005).unwrap()[0];
    assert_eq!(a.stat(StatField::ThreeAttempts), Some(200.0));
    assert!(close(a.stat(StatField::ThreePct).unwrap(), 0.35));
    assert_eq!(a.stat(StatField::Minutes), Some(2500.0));
}

#[test]
fn test_missing_three_pct_drops_player() {
    let rows = vec![
        stint("2005", "A", "150", "150", "", "0.50", "0.55", "2000"),
        stint("2005", "B", "150", "150", "0.38", "0.50", "0.55", "2000"),
    ];
    let config = PipelineConfig::default();
    let record = RowFilter::new(&config).filter(&rows[0]).unwrap();
    assert_eq!(record.stats[&StatField::ThreePct], None);

    let index = build_index(&rows, &config);
    let players: Vec<_> = index
        .get(2005)
        .unwrap()
        .iter()
        .map(|p| p.player.as_str())
        .collect();
    assert_eq!(players, vec!["B"]);
}

#[test]
fn test_year_with_only_incomplete_players_is_absent() {
    let rows = vec![
        stint("2004", "A", "150", "150", "0.40", "0.50", "", "2000"),
        stint("2004", "B", "150", "150", "0.40", "", "0.55", "2000"),
        stint("2005", "C", "150", "150", "0.40", "0.50", "0.55", "2000"),
    ];
    let index = build_index(&rows, &PipelineConfig::default());
    assert!(index.get(2004).is_none());
    assert_eq!(index.years().collect::<Vec<_>>(), vec![2005]);
    assert_eq!(index.bounds(), Some((2005, 2005)));
}

#[test]
fn test_float_year_cells_group_together() {
    let rows = vec![
        stint("2005.0", "A", "150", "150", "0.40", "0.50", "0.55", "2000"),
        stint("2005", "A", "150", "150", "0.30", "0.50", "0.55", "1000"),
    ];
    let index = build_index(&rows, &PipelineConfig::default());
    assert_eq!(index.aggregate_count(), 1);
    assert_eq!(index.get(2005).unwrap()[0].stat(StatField::Minutes), Some(3000.0));
}

// --- THRESHOLDS ---

#[rstest]
#[case("99", "150", false)]
#[case("150", "99", false)]
#[case("100", "100", true)]
#[case("", "150", false)]
#[case("many", "150", false)]
fn test_split_threshold(#[case] three_att: &str, #[case] two_att: &str, #[case] kept: bool) {
    let rows = vec![stint("2005", "A", three_att, two_att, "0.4", "0.5", "0.55", "2000")];
    let index = build_index(&rows, &Preset::SplitAttempts100.config());
    assert_eq!(!index.is_empty(), kept);
}

#[rstest]
#[case("499", false)]
#[case("500", true)]
#[case("1500.0", true)]
fn test_field_goal_threshold(#[case] fga: &str, #[case] kept: bool) {
    let mut row = stint("2005", "A", "0", "0", "0.4", "0.5", "0.55", "2000");
    row.insert("FGA".into(), fga.into());
    let index = build_index(&[row], &Preset::FieldGoalAttempts500.config());
    assert_eq!(!index.is_empty(), kept);
}

// --- RENAMED COLUMNS ---

/// A config reading lower-case export headers instead of the default names.
fn renamed_config(threshold: Threshold) -> PipelineConfig {
    let fields = [
        (StatField::ThreeAttempts, "three_att", Rollup::Sum),
        (StatField::TwoAttempts, "two_att", Rollup::Sum),
        (StatField::FieldGoalAttempts, "fga", Rollup::Sum),
        (StatField::ThreePct, "three_pct", Rollup::Mean),
        (StatField::TwoPct, "two_pct", Rollup::Mean),
        (StatField::TrueShooting, "ts", Rollup::Mean),
        (StatField::Minutes, "mins", Rollup::Sum),
    ]
    .iter()
    .map(|(field, column, rollup)| FieldSpec {
        field: *field,
        column: column.to_string(),
        rollup: *rollup,
    })
    .collect();
    PipelineConfig {
        threshold,
        fields,
        columns: KeyColumns {
            year: "season".into(),
            player: "name".into(),
        },
        ..PipelineConfig::default()
    }
}

fn renamed_row(attempts: &str) -> RawRow {
    [
        ("season", "2005"),
        ("name", "A"),
        ("three_att", attempts),
        ("two_att", attempts),
        ("fga", attempts),
        ("three_pct", "0.4"),
        ("two_pct", "0.5"),
        ("ts", "0.55"),
        ("mins", "2000"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

#[rstest]
#[case::split_attempts(Threshold::split(100.0, 100.0), "150", true)]
#[case::split_attempts_below(Threshold::split(100.0, 100.0), "99", false)]
#[case::field_goals(Threshold::field_goals(500.0), "600", true)]
#[case::field_goals_below(Threshold::field_goals(500.0), "150", false)]
fn test_renamed_columns_reach_the_index(
    #[case] threshold: Threshold,
    #[case] attempts: &str,
    #[case] kept: bool,
) {
    let config = renamed_config(threshold);
    assert!(config.validate().is_ok());

    let index = build_index(&[renamed_row(attempts)], &config);
    assert_eq!(!index.is_empty(), kept);
    if kept {
        assert_eq!(index.years().collect::<Vec<_>>(), vec![2005]);
        let a = &index.get(2005).unwrap()[0];
        assert_eq!(a.player, "A");
        assert_eq!(a.stat(StatField::Minutes), Some(2000.0));
    }
}

#[test]
fn test_threshold_column_override_beats_field_spec() {
    let threshold = Threshold::FieldGoalAttempts {
        min_attempts: 500.0,
        column: Some("fga_total".into()),
    };
    let config = renamed_config(threshold);
    let mut row = renamed_row("150");
    row.insert("fga_total".into(), "900".into());
    assert!(!build_index(&[row.clone()], &config).is_empty());

    row.remove("fga_total");
    assert!(build_index(&[row], &config).is_empty());
}

// --- INDEX SHAPE ---

#[test]
fn test_years_iterate_ascending_regardless_of_input_order() {
    let rows: Vec<_> = ["2010", "1999", "2005", "2001"]
        .iter()
        .map(|y| stint(y, "A", "150", "150", "0.4", "0.5", "0.55", "2000"))
        .collect();
    let index = build_index(&rows, &PipelineConfig::default());
    assert_eq!(index.years().collect::<Vec<_>>(), vec![1999, 2001, 2005, 2010]);
    assert_eq!(index.bounds(), Some((1999, 2010)));
    assert_eq!(index.nearest_year(2003), Some(2001));
}

#[test]
fn test_percentages_are_not_rescaled() {
    let mut config = PipelineConfig::default();
    config.percent_scale = shot_scatter::config::PercentScale::Percent;
    let rows = vec![stint("2005", "A", "150", "150", "38.0", "50.0", "55.0", "2000")];
    let index = build_index(&rows, &config);
    let a = &index.get(2005).unwrap()[0];
    assert_eq!(a.stat(StatField::ThreePct), Some(38.0));
    assert_eq!(a.stat(StatField::TrueShooting), Some(55.0));
}
