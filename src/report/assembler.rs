//! Metrics report assembly.
//!
//! Runs the engine steps in a fixed order:
//! 1. Total value
//! 2. Category aggregate
//! 3. Entity aggregate
//! 4. ABC classification
//! 5. Pareto classification
//! 6. A-class value
//! 7. Peak value
//! 8. Frontier value
//! 9. Scenario savings
//!
//! The report is always recomputed from scratch. Empty input or input
//! without a value column yields `MetricsReport::empty`.

use super::schema::MetricsReport;
use crate::aggregator::{classify_abc, classify_pareto_with_cutoff, group_and_sum, peak_value, AbcClass};
use crate::records::{Column, RecordSet};
use crate::scenario::{evaluate_scenario, ScenarioParameters, SegmentValues};
use crate::utils::config::AnalyticsConfig;
use log::{debug, info};

/// Compute every metric for `records` under `params`
///
/// **Public** - main entry point of the engine
///
/// # Arguments
/// * `records` - Normalized record set, already filtered
/// * `params` - Scenario parameters for the what-if savings
/// * `config` - Classification thresholds and peak fraction
///
/// # Returns
/// A fully populated report, or the zeroed report for empty input
pub fn calculate_all_metrics(
    records: &RecordSet,
    params: &ScenarioParameters,
    config: &AnalyticsConfig,
) -> MetricsReport {
    if records.is_empty() || !records.has_column(Column::Value) {
        info!("No records with values, returning empty report");
        return MetricsReport::empty(params.clone());
    }

    debug!("Computing metrics over {} records", records.len());

    let total_value = records.total_value();
    let category_aggregate = group_and_sum(records, Column::Category);
    let entity_aggregate = group_and_sum(records, Column::Entity);

    let abc = classify_abc(
        records,
        Some(Column::Category),
        config.abc_a_threshold,
        config.abc_b_threshold,
    );
    let pareto = classify_pareto_with_cutoff(records, Column::Entity, config.pareto_threshold);

    let segments = SegmentValues {
        a_class_value: abc.class_total(AbcClass::A),
        peak_value: peak_value(records, config.peak_fraction),
        frontier_value: pareto.frontier_total(),
    };

    debug!(
        "Segments: A-class {:.2}, peak {:.2}, frontier {:.2}",
        segments.a_class_value, segments.peak_value, segments.frontier_value
    );

    let outcome = evaluate_scenario(&segments, params, records.date_span());

    info!(
        "Metrics ready: total {:.2}, savings {} ({} annual), ROI {:.1}%",
        total_value, outcome.savings.total, outcome.savings.annual, outcome.roi
    );

    MetricsReport {
        record_count: records.len(),
        total_value,
        category_aggregate,
        entity_aggregate,
        abc,
        pareto,
        a_class_value: segments.a_class_value,
        peak_value: segments.peak_value,
        frontier_value: segments.frontier_value,
        scenarios: params.clone(),
        savings: outcome.savings,
        roi: outcome.roi,
        period_days: outcome.period_days,
    }
}

/// `calculate_all_metrics` with default thresholds
pub fn calculate_default_metrics(records: &RecordSet, params: &ScenarioParameters) -> MetricsReport {
    calculate_all_metrics(records, params, &AnalyticsConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Columns, Record};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn two_entities() -> RecordSet {
        RecordSet::new(vec![
            Record::new(day(1), 100.0).with_entity("E1").with_category("Cat1"),
            Record::new(day(1), 900.0).with_entity("E2").with_category("Cat1"),
        ])
    }

    #[test]
    fn test_empty_input_short_circuits() {
        let report = calculate_default_metrics(&RecordSet::empty(), &ScenarioParameters::default());
        assert_eq!(report, MetricsReport::empty(ScenarioParameters::default()));
    }

    #[test]
    fn test_missing_value_column_short_circuits() {
        let columns = Columns {
            value: false,
            ..Columns::all()
        };
        let set = RecordSet::with_columns(vec![Record::new(day(1), 5.0)], columns);
        let report = calculate_default_metrics(&set, &ScenarioParameters::default());
        assert!(report.is_empty());
        assert_eq!(report.total_value, 0.0);
    }

    #[test]
    fn test_single_category_is_class_c() {
        // one category holding 100% of value: cumulative 100 > 95
        let report = calculate_default_metrics(&two_entities(), &ScenarioParameters::default());
        assert_eq!(report.abc.group_by, Some(Column::Category));
        assert_eq!(report.abc.rows.len(), 1);
        assert_eq!(report.abc.rows[0].abc_class, AbcClass::C);
        assert_eq!(report.a_class_value, 0.0);
        assert_eq!(report.savings.a, 0);
    }

    #[test]
    fn test_abc_falls_back_to_entity() {
        let set = RecordSet::new(vec![
            Record::new(day(1), 100.0).with_entity("E1"),
            Record::new(day(1), 900.0).with_entity("E2"),
        ]);
        let report = calculate_default_metrics(&set, &ScenarioParameters::default());
        assert_eq!(report.abc.group_by, Some(Column::Entity));
        assert_eq!(report.abc.rows[0].abc_class, AbcClass::B);
        assert_eq!(report.abc.rows[1].abc_class, AbcClass::C);
        assert!(report.category_aggregate.is_empty());
    }

    #[test]
    fn test_report_fields() {
        let report = calculate_default_metrics(&two_entities(), &ScenarioParameters::default());
        assert_eq!(report.record_count, 2);
        assert_eq!(report.total_value, 1000.0);
        assert_eq!(report.peak_value, 1000.0);
        // E2 alone is 90% > 80, so the frontier is empty
        assert_eq!(report.frontier_value, 0.0);
        assert_eq!(report.period_days, 1);
        // round(1000 * 15 / 100) = 150
        assert_eq!(report.savings.peak, 150);
        assert_eq!(report.savings.total, 150);
        assert_eq!(report.savings.annual, 54750);
        assert_eq!(report.roi, 0.3);
    }
}
