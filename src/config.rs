use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::{Rollup, StatField};

/// Environment variable naming an optional JSON pipeline config.
pub const CONFIG_ENV_VAR: &str = "SHOT_SCATTER_CONFIG";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("field list must include {0:?} (it drives a chart axis)")]
    MissingAxisField(StatField),

    #[error("field {0:?} is configured more than once")]
    DuplicateField(StatField),

    #[error("{0} column name is empty")]
    EmptyColumn(&'static str),

    #[error("threshold minimum for {column} must be finite and non-negative, got {value}")]
    InvalidMinimum { column: String, value: f64 },
}

// ---------------------------------------------------------------------------
// Threshold – which rows are eligible at all
// ---------------------------------------------------------------------------

/// Attempt-count gate applied to every row before typing.
///
/// Column overrides are optional; without one the column of the matching
/// [`FieldSpec`] is used, then the usual export name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Threshold {
    /// Both two- and three-point attempts must reach their minimum.
    SplitAttempts {
        min_two_attempts: f64,
        min_three_attempts: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        two_column: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        three_column: Option<String>,
    },
    /// Field-goal attempts must reach the minimum.
    FieldGoalAttempts {
        min_attempts: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column: Option<String>,
    },
}

/// One attempt gate after column resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttemptGate<'a> {
    pub column: &'a str,
    pub minimum: f64,
}

impl Threshold {
    pub fn split(min_two_attempts: f64, min_three_attempts: f64) -> Self {
        Threshold::SplitAttempts {
            min_two_attempts,
            min_three_attempts,
            two_column: None,
            three_column: None,
        }
    }

    pub fn field_goals(min_attempts: f64) -> Self {
        Threshold::FieldGoalAttempts {
            min_attempts,
            column: None,
        }
    }

    /// `(attempt field, column override, minimum)` triples.
    pub fn requirements(&self) -> Vec<(StatField, Option<&str>, f64)> {
        match self {
            Threshold::SplitAttempts {
                min_two_attempts,
                min_three_attempts,
                two_column,
                three_column,
            } => vec![
                (
                    StatField::ThreeAttempts,
                    three_column.as_deref(),
                    *min_three_attempts,
                ),
                (
                    StatField::TwoAttempts,
                    two_column.as_deref(),
                    *min_two_attempts,
                ),
            ],
            Threshold::FieldGoalAttempts {
                min_attempts,
                column,
            } => vec![(
                StatField::FieldGoalAttempts,
                column.as_deref(),
                *min_attempts,
            )],
        }
    }

    /// One-line description shown under the chart title.
    pub fn describe(&self) -> String {
        match self {
            Threshold::SplitAttempts {
                min_two_attempts,
                min_three_attempts,
                ..
            } if min_two_attempts == min_three_attempts => {
                format!("Players with at least {min_three_attempts} 3PT and 2PT attempts.")
            }
            Threshold::SplitAttempts {
                min_two_attempts,
                min_three_attempts,
                ..
            } => format!(
                "Players with at least {min_three_attempts} 3PT and {min_two_attempts} 2PT attempts."
            ),
            Threshold::FieldGoalAttempts { min_attempts, .. } => {
                format!("Players with at least {min_attempts} field-goal attempts.")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Field list, key columns and percent convention
// ---------------------------------------------------------------------------

/// One configured statistic: where to read it and how to roll it up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub field: StatField,
    pub column: String,
    pub rollup: Rollup,
}

impl FieldSpec {
    /// Spec reading `field` from its usual column.
    pub fn new(field: StatField, rollup: Rollup) -> Self {
        FieldSpec {
            field,
            column: field.default_column().to_string(),
            rollup,
        }
    }
}

/// Columns holding the grouping keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyColumns {
    pub year: String,
    pub player: String,
}

impl Default for KeyColumns {
    fn default() -> Self {
        KeyColumns {
            year: "Year".to_string(),
            player: "Player".to_string(),
        }
    }
}

/// How percentage cells are written in the source file.
///
/// Only affects formatting; values are never rescaled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentScale {
    /// `0.452`
    #[default]
    Fraction,
    /// `45.2`
    Percent,
}

impl PercentScale {
    /// Format a percentage value as `45.2%`.
    pub fn format(self, value: f64) -> String {
        match self {
            PercentScale::Fraction => format!("{:.1}%", value * 100.0),
            PercentScale::Percent => format!("{value:.1}%"),
        }
    }
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// At least 100 two- and three-point attempts.
    #[default]
    SplitAttempts100,
    /// At least 500 field-goal attempts.
    FieldGoalAttempts500,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::SplitAttempts100, Preset::FieldGoalAttempts500];

    pub fn label(self) -> &'static str {
        match self {
            Preset::SplitAttempts100 => "2PA & 3PA ≥ 100",
            Preset::FieldGoalAttempts500 => "FGA ≥ 500",
        }
    }

    pub fn config(self) -> PipelineConfig {
        use Rollup::{First, Mean, Sum};
        match self {
            Preset::SplitAttempts100 => PipelineConfig {
                threshold: Threshold::split(100.0, 100.0),
                fields: vec![
                    FieldSpec::new(StatField::Age, First),
                    FieldSpec::new(StatField::ThreePct, Mean),
                    FieldSpec::new(StatField::ThreeAttempts, Sum),
                    FieldSpec::new(StatField::TwoPct, Mean),
                    FieldSpec::new(StatField::TwoAttempts, Sum),
                    FieldSpec::new(StatField::TrueShooting, Mean),
                    FieldSpec::new(StatField::Minutes, Sum),
                ],
                percent_scale: PercentScale::Fraction,
                columns: KeyColumns::default(),
            },
            Preset::FieldGoalAttempts500 => PipelineConfig {
                threshold: Threshold::field_goals(500.0),
                fields: vec![
                    FieldSpec::new(StatField::Age, First),
                    FieldSpec::new(StatField::TwoPct, Mean),
                    FieldSpec::new(StatField::ThreePct, Mean),
                    FieldSpec::new(StatField::TrueShooting, Mean),
                    FieldSpec::new(StatField::FieldGoalAttempts, Sum),
                    FieldSpec::new(StatField::Minutes, Sum),
                ],
                percent_scale: PercentScale::Fraction,
                columns: KeyColumns::default(),
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// PipelineConfig
// ---------------------------------------------------------------------------

/// Everything the row filter and aggregator need to know about a deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub threshold: Threshold,
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub percent_scale: PercentScale,
    #[serde(default)]
    pub columns: KeyColumns,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Preset::default().config()
    }
}

impl PipelineConfig {
    /// Read and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: PipelineConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("validating config {}", path.display()))?;
        Ok(config)
    }

    /// Config named by [`CONFIG_ENV_VAR`], or the default preset.
    pub fn from_env_or_default() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            return PipelineConfig::default();
        };
        match PipelineConfig::from_json_file(Path::new(&path)) {
            Ok(config) => {
                log::info!("Using pipeline config from {}", Path::new(&path).display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring {CONFIG_ENV_VAR}: {e:#}; falling back to default preset");
                PipelineConfig::default()
            }
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for spec in &self.fields {
            if !seen.insert(spec.field) {
                return Err(ConfigError::DuplicateField(spec.field));
            }
        }
        for axis in [StatField::TwoPct, StatField::ThreePct] {
            if !seen.contains(&axis) {
                return Err(ConfigError::MissingAxisField(axis));
            }
        }
        if self.columns.year.trim().is_empty() {
            return Err(ConfigError::EmptyColumn("year"));
        }
        if self.columns.player.trim().is_empty() {
            return Err(ConfigError::EmptyColumn("player"));
        }
        for spec in &self.fields {
            if spec.column.trim().is_empty() {
                return Err(ConfigError::EmptyColumn(spec.field.default_column()));
            }
        }
        for (field, column, _) in self.threshold.requirements() {
            if column.is_some_and(|c| c.trim().is_empty()) {
                return Err(ConfigError::EmptyColumn(field.default_column()));
            }
        }
        for gate in self.attempt_gates() {
            if !gate.minimum.is_finite() || gate.minimum < 0.0 {
                return Err(ConfigError::InvalidMinimum {
                    column: gate.column.to_string(),
                    value: gate.minimum,
                });
            }
        }
        Ok(())
    }

    /// Threshold gates with their CSV columns resolved: an explicit override,
    /// else the column of the configured field, else the export default.
    pub fn attempt_gates(&self) -> Vec<AttemptGate<'_>> {
        self.threshold
            .requirements()
            .into_iter()
            .map(|(field, column, minimum)| {
                let column = column
                    .or_else(|| {
                        self.fields
                            .iter()
                            .find(|spec| spec.field == field)
                            .map(|spec| spec.column.as_str())
                    })
                    .unwrap_or(field.default_column());
                AttemptGate { column, minimum }
            })
            .collect()
    }

    /// The preset this config is identical to, if any.
    pub fn preset(&self) -> Option<Preset> {
        Preset::ALL.into_iter().find(|p| p.config() == *self)
    }
}
