//! Scenario parameters and the savings calculator.

pub mod params;
pub mod savings;

pub use params::ScenarioParameters;
pub use savings::{
    annualize, evaluate_scenario, inclusive_days, period_days, roi, segment_saving, Savings,
    ScenarioOutcome, SegmentValues,
};
