//! Scenario parameters supplied by the caller.
//!
//! Parameters arrive as a loose key/value map (UI state, JSON, CLI flags).
//! Recognized keys:
//!
//! | key | aliases | default |
//! |-----|---------|---------|
//! | `reduce_a` | | 10.0 |
//! | `reduce_peak` | | 15.0 |
//! | `reduce_frontier` | `reduce_top_entity`, `reduce_top_store` | 20.0 |
//! | `investments` | `investment` | 50000.0 |
//! | `date_range` | | none |
//!
//! Unknown keys are ignored. A recognized key with the wrong type is an error.

use crate::utils::config::ScenarioDefaults;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const FRONTIER_KEYS: &[&str] = &["reduce_frontier", "reduce_top_entity", "reduce_top_store"];
const INVESTMENT_KEYS: &[&str] = &["investments", "investment"];

/// What-if inputs for one report computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    /// Assumed reduction on the A-class subtotal, percent
    pub reduce_a: f64,

    /// Assumed reduction on peak-period value, percent
    pub reduce_peak: f64,

    /// Assumed reduction on the Pareto frontier subtotal, percent
    pub reduce_frontier: f64,

    /// Considered investment, currency
    pub investments: f64,

    /// Selected inclusive date range used for annualization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        Self::from_defaults(&ScenarioDefaults::default())
    }
}

impl ScenarioParameters {
    pub fn from_defaults(defaults: &ScenarioDefaults) -> Self {
        Self {
            reduce_a: defaults.reduce_a,
            reduce_peak: defaults.reduce_peak,
            reduce_frontier: defaults.reduce_frontier,
            investments: defaults.investments,
            date_range: None,
        }
    }

    /// Read parameters from a JSON object, filling gaps with built-in defaults
    pub fn from_json(value: &Value) -> Result<Self, serde_json::Error> {
        Self::from_json_with_defaults(value, &ScenarioDefaults::default())
    }

    /// Read parameters from a JSON object, filling gaps with `defaults`
    ///
    /// When several aliases of one key are present, the canonical name wins,
    /// then aliases in table order.
    pub fn from_json_with_defaults(
        value: &Value,
        defaults: &ScenarioDefaults,
    ) -> Result<Self, serde_json::Error> {
        let mut params = Self::from_defaults(defaults);

        let Some(map) = value.as_object() else {
            return Err(serde::de::Error::custom("scenario parameters must be a JSON object"));
        };

        let lookup = |keys: &[&str]| keys.iter().find_map(|k| map.get(*k));

        if let Some(v) = lookup(&["reduce_a"]) {
            params.reduce_a = field(v)?;
        }
        if let Some(v) = lookup(&["reduce_peak"]) {
            params.reduce_peak = field(v)?;
        }
        if let Some(v) = lookup(FRONTIER_KEYS) {
            params.reduce_frontier = field(v)?;
        }
        if let Some(v) = lookup(INVESTMENT_KEYS) {
            params.investments = field(v)?;
        }
        if let Some(v) = lookup(&["date_range"]) {
            params.date_range = field(v)?;
        }

        Ok(params)
    }

    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = Some((start, end));
        self
    }
}

fn field<T: DeserializeOwned>(value: &Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value.clone())
}
