//! Configuration and constants for the engine and CLI.

use super::error::ConfigError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Environment variable holding the default config path
pub const CONFIG_ENV_VAR: &str = "LOSS_SENTINEL_CONFIG";

// ABC / Pareto defaults (cumulative percent)
pub const DEFAULT_ABC_A_THRESHOLD: f64 = 80.0;
pub const DEFAULT_ABC_B_THRESHOLD: f64 = 95.0;
pub const DEFAULT_PARETO_THRESHOLD: f64 = 80.0;

/// Share of distinct dates treated as peak periods
pub const DEFAULT_PEAK_FRACTION: f64 = 0.2;

pub const DEFAULT_FORECAST_DAYS: u32 = 30;
pub const MAX_FORECAST_HORIZON_DAYS: u32 = 90;
pub const MIN_FORECAST_HISTORY_DAYS: usize = 14;

// Scenario defaults (percent, currency)
pub const DEFAULT_REDUCE_A: f64 = 10.0;
pub const DEFAULT_REDUCE_PEAK: f64 = 15.0;
pub const DEFAULT_REDUCE_FRONTIER: f64 = 20.0;
pub const DEFAULT_INVESTMENTS: f64 = 50_000.0;

/// Annualization fallback when no date range can be determined
pub const DEFAULT_PERIOD_DAYS: i64 = 30;

/// Total savings above which an investment recommendation is emitted
pub const INVESTMENT_RECOMMENDATION_FLOOR: i64 = 50_000;

// Header patterns for column auto-detection, checked in order
pub const DATE_PATTERNS: &[&str] = &["date", "time", "day", "order_date", "transaction_date", "дата"];
pub const VALUE_PATTERNS: &[&str] = &[
    "amount", "value", "loss", "revenue", "sales", "cost", "qty", "quantity", "сумма", "потери",
];
pub const ENTITY_PATTERNS: &[&str] = &[
    "store", "shop", "region", "client", "customer", "id", "sku", "магазин",
];
pub const CATEGORY_PATTERNS: &[&str] = &[
    "category", "group", "product", "type", "item", "категория", "товар",
];

/// Complete engine configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    #[serde(default)]
    pub scenarios: ScenarioDefaults,

    /// Explicit header names per role (overrides auto-detection)
    #[serde(default)]
    pub mapping: MappingOverrides,
}

/// Classification and heuristic settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub abc_a_threshold: f64,
    pub abc_b_threshold: f64,
    pub pareto_threshold: f64,
    pub peak_fraction: f64,
    pub forecast_days: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            abc_a_threshold: DEFAULT_ABC_A_THRESHOLD,
            abc_b_threshold: DEFAULT_ABC_B_THRESHOLD,
            pareto_threshold: DEFAULT_PARETO_THRESHOLD,
            peak_fraction: DEFAULT_PEAK_FRACTION,
            forecast_days: DEFAULT_FORECAST_DAYS,
        }
    }
}

/// Scenario values used when the caller does not supply them
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ScenarioDefaults {
    pub reduce_a: f64,
    pub reduce_peak: f64,
    pub reduce_frontier: f64,
    pub investments: f64,
}

impl Default for ScenarioDefaults {
    fn default() -> Self {
        Self {
            reduce_a: DEFAULT_REDUCE_A,
            reduce_peak: DEFAULT_REDUCE_PEAK,
            reduce_frontier: DEFAULT_REDUCE_FRONTIER,
            investments: DEFAULT_INVESTMENTS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct MappingOverrides {
    pub date: Option<String>,
    pub value: Option<String>,
    pub entity: Option<String>,
    pub category: Option<String>,
}

impl EngineConfig {
    /// Check threshold ordering and value ranges.
    ///
    /// This is the only place `a_threshold < b_threshold` is enforced;
    /// the classifier trusts whatever it is given.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.analytics;

        if a.abc_a_threshold >= a.abc_b_threshold {
            return Err(ConfigError::InvalidThreshold {
                a: a.abc_a_threshold,
                b: a.abc_b_threshold,
            });
        }

        check_percent("analytics.abc_a_threshold", a.abc_a_threshold)?;
        check_percent("analytics.abc_b_threshold", a.abc_b_threshold)?;
        check_percent("analytics.pareto_threshold", a.pareto_threshold)?;

        if !(a.peak_fraction > 0.0 && a.peak_fraction <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "analytics.peak_fraction",
                value: a.peak_fraction,
            });
        }

        if !(1..=MAX_FORECAST_HORIZON_DAYS).contains(&a.forecast_days) {
            return Err(ConfigError::OutOfRange {
                field: "analytics.forecast_days",
                value: f64::from(a.forecast_days),
            });
        }

        let s = &self.scenarios;
        check_percent("scenarios.reduce_a", s.reduce_a)?;
        check_percent("scenarios.reduce_peak", s.reduce_peak)?;
        check_percent("scenarios.reduce_frontier", s.reduce_frontier)?;

        if s.investments < 0.0 || !s.investments.is_finite() {
            return Err(ConfigError::OutOfRange {
                field: "scenarios.investments",
                value: s.investments,
            });
        }

        Ok(())
    }
}

fn check_percent(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

/// Load and validate an engine configuration from a TOML file
///
/// # Errors
/// * `ConfigError::Io` - If file cannot be read
/// * `ConfigError::ParseFailed` - If TOML is invalid
/// * `ConfigError::InvalidThreshold` / `OutOfRange` - If values fail validation
pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfig, ConfigError> {
    let path = path.as_ref();
    debug!("Loading config from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    let config = parse_config(&contents)?;

    Ok(config)
}

/// Parse and validate configuration from TOML text
pub fn parse_config(contents: &str) -> Result<EngineConfig, ConfigError> {
    let config: EngineConfig = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}
