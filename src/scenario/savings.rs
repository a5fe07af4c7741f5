//! What-if savings arithmetic.
//!
//! Each segment saving is rounded to a whole amount on its own, then the
//! rounded terms are summed. The total is therefore exactly the sum of the
//! parts regardless of rounding.

use super::params::ScenarioParameters;
use crate::utils::config::DEFAULT_PERIOD_DAYS;
use crate::utils::rounding::{round_amount, round_decimal};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

/// Classified subtotals the scenario is applied to
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SegmentValues {
    /// Sum over A-class groups
    pub a_class_value: f64,

    /// Sum over peak dates
    pub peak_value: f64,

    /// Sum over Pareto frontier groups
    pub frontier_value: f64,
}

/// Savings per segment plus totals, whole currency units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Savings {
    pub a: i64,
    pub peak: i64,
    pub frontier: i64,
    pub total: i64,
    pub annual: i64,
}

/// Full result of applying one scenario
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub savings: Savings,
    pub roi: f64,
    pub period_days: i64,
}

/// `round(value * pct / 100)`
pub fn segment_saving(value: f64, reduction_pct: f64) -> i64 {
    round_amount(value * reduction_pct / 100.0)
}

/// Inclusive day count of `[start, end]`
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Period length used for annualization
///
/// The explicit range wins, then the span of the data, then 30 days.
pub fn period_days(
    selected: Option<(NaiveDate, NaiveDate)>,
    data_span: Option<(NaiveDate, NaiveDate)>,
) -> i64 {
    selected
        .or(data_span)
        .map(|(start, end)| inclusive_days(start, end))
        .unwrap_or(DEFAULT_PERIOD_DAYS)
}

/// `round(total * 365 / period_days)`, zero when the period is not positive
pub fn annualize(total: i64, period_days: i64) -> i64 {
    if period_days <= 0 {
        return 0;
    }
    round_amount(total as f64 * 365.0 / period_days as f64)
}

/// `round(total / investment * 100, 1)`, zero when investment is not positive
pub fn roi(total_savings: i64, investment: f64) -> f64 {
    if investment <= 0.0 {
        return 0.0;
    }
    round_decimal(total_savings as f64 / investment * 100.0, 1)
}

/// Apply scenario percentages to the segment values
///
/// # Arguments
/// * `segments` - A-class, peak and frontier subtotals
/// * `params` - Reduction percentages, investment and optional date range
/// * `data_span` - First and last date in the data, used when `params` has no range
pub fn evaluate_scenario(
    segments: &SegmentValues,
    params: &ScenarioParameters,
    data_span: Option<(NaiveDate, NaiveDate)>,
) -> ScenarioOutcome {
    let a = segment_saving(segments.a_class_value, params.reduce_a);
    let peak = segment_saving(segments.peak_value, params.reduce_peak);
    let frontier = segment_saving(segments.frontier_value, params.reduce_frontier);
    let total = a + peak + frontier;

    let days = period_days(params.date_range, data_span);
    let annual = annualize(total, days);

    debug!(
        "Scenario: a={} peak={} frontier={} total={} over {} days, annual={}",
        a, peak, frontier, total, days, annual
    );

    ScenarioOutcome {
        savings: Savings {
            a,
            peak,
            frontier,
            total,
            annual,
        },
        roi: roi(total, params.investments),
        period_days: days,
    }
}
