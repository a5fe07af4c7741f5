//! Aggregation of record sets into grouped metrics.
//!
//! This module transforms a normalized record set into:
//! - Grouped sums with percentage shares (category / entity / date)
//! - ABC classes and the Pareto frontier
//! - Peak-period value (top days by volume)
//! - Per-entity statistics
//! - Day / week / month series and weekday totals

pub mod classification;
pub mod grouping;
pub mod peak;
pub mod stats;
pub mod timeline;

// Re-export main types and functions
pub use classification::{
    classify_abc, classify_abc_default, classify_pareto, classify_pareto_with_cutoff,
    resolve_abc_column, AbcAggregate, AbcClass, AbcRow, ParetoAggregate, ParetoRow,
};
pub use grouping::{group_and_sum, grouped_sums, GroupedAggregate, GroupedRow};
pub use peak::{peak_count, peak_value, peak_value_default};
pub use stats::{entity_statistics, EntityStats};
pub use timeline::{period_series, weekday_totals, Granularity, PeriodPoint, WeekdayTotal};
