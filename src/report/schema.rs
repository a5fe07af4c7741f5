//! Metrics report definitions.
//!
//! A `MetricsReport` is the single output of one engine call. Every field is
//! public and independently serializable so a caller can render any subset.

use crate::aggregator::{AbcAggregate, GroupedAggregate, ParetoAggregate};
use crate::scenario::{Savings, ScenarioParameters};
use crate::utils::rounding::{round_to, safe_percentage};
use serde::{Deserialize, Serialize};

/// Complete metrics for one record set and one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Number of records the report was computed from
    pub record_count: usize,

    /// Sum of `value` over all records
    pub total_value: f64,

    /// Breakdown by category (empty when the column is absent)
    pub category_aggregate: GroupedAggregate,

    /// Breakdown by entity (empty when the column is absent)
    pub entity_aggregate: GroupedAggregate,

    /// ABC classification over the resolved grouping column
    pub abc: AbcAggregate,

    /// Entity-level Pareto frontier
    pub pareto: ParetoAggregate,

    /// Sum over A-class groups
    pub a_class_value: f64,

    /// Sum over the peak dates
    pub peak_value: f64,

    /// Sum over frontier entities
    pub frontier_value: f64,

    /// Scenario parameters the savings were computed with
    pub scenarios: ScenarioParameters,

    pub savings: Savings,

    /// Return on investment, percent, 1 decimal
    pub roi: f64,

    /// Days used to annualize savings
    pub period_days: i64,
}

impl MetricsReport {
    /// The zeroed report returned for empty input
    ///
    /// All aggregates are empty, all values and savings zero, `period_days`
    /// zero. The scenario echo still carries what the caller passed in.
    pub fn empty(scenarios: ScenarioParameters) -> Self {
        Self {
            record_count: 0,
            total_value: 0.0,
            category_aggregate: GroupedAggregate::empty(),
            entity_aggregate: GroupedAggregate::empty(),
            abc: AbcAggregate::default(),
            pareto: ParetoAggregate::default(),
            a_class_value: 0.0,
            peak_value: 0.0,
            frontier_value: 0.0,
            scenarios,
            savings: Savings::default(),
            roi: 0.0,
            period_days: 0,
        }
    }

    /// True for the zeroed terminal state
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    /// Share of total value held by A-class groups, 1 decimal
    pub fn a_class_share(&self) -> f64 {
        round_to(safe_percentage(self.a_class_value, self.total_value), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_zeroed() {
        let report = MetricsReport::empty(ScenarioParameters::default());
        assert!(report.is_empty());
        assert_eq!(report.total_value, 0.0);
        assert!(report.category_aggregate.is_empty());
        assert!(report.entity_aggregate.is_empty());
        assert!(report.abc.is_empty());
        assert!(report.pareto.is_empty());
        assert_eq!(report.savings, Savings::default());
        assert_eq!(report.roi, 0.0);
        assert_eq!(report.a_class_share(), 0.0);
    }

    #[test]
    fn test_serializes_named_fields() {
        let report = MetricsReport::empty(ScenarioParameters::default());
        let json = serde_json::to_value(&report).unwrap();
        for field in [
            "total_value",
            "category_aggregate",
            "entity_aggregate",
            "abc",
            "pareto",
            "a_class_value",
            "peak_value",
            "frontier_value",
            "scenarios",
            "savings",
            "roi",
            "period_days",
        ] {
            assert!(json.get(field).is_some(), "missing field {}", field);
        }
        assert_eq!(json["savings"]["total"], 0);
    }
}
