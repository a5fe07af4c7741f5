//! ABC classification and Pareto frontier marking.
//!
//! Both walk a grouped aggregate in descending order and track the running
//! share of the total (`cumulative_percentage`):
//! - ABC: `<= a` is A, `<= b` is B, everything after is C
//! - Pareto: groups with `cumulative_percentage <= cutoff` form the frontier
//!
//! With a zero total no group can reach a cutoff: every row gets
//! `cumulative_percentage = 0`, class C, and is off the frontier.

use super::grouping::grouped_sums;
use crate::records::{Column, RecordSet};
use crate::utils::config::{DEFAULT_ABC_A_THRESHOLD, DEFAULT_ABC_B_THRESHOLD, DEFAULT_PARETO_THRESHOLD};
use crate::utils::rounding::{round_to, safe_percentage};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ABC class label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbcClass {
    A,
    B,
    C,
}

impl AbcClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AbcClass::A => "A",
            AbcClass::B => "B",
            AbcClass::C => "C",
        }
    }

    /// Class for a cumulative percentage under the given thresholds
    pub fn assign(cumulative_percentage: f64, a_threshold: f64, b_threshold: f64) -> Self {
        if cumulative_percentage <= a_threshold {
            AbcClass::A
        } else if cumulative_percentage <= b_threshold {
            AbcClass::B
        } else {
            AbcClass::C
        }
    }
}

impl fmt::Display for AbcClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group with its ABC class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcRow {
    pub key: String,
    pub value: f64,
    /// Share of total, 1 decimal
    pub percentage: f64,
    /// Running share of total in sort order, 2 decimals
    pub cumulative_percentage: f64,
    pub abc_class: AbcClass,
}

/// A group with its Pareto frontier flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoRow {
    pub key: String,
    pub value: f64,
    pub percentage: f64,
    pub cumulative_percentage: f64,
    pub is_frontier: bool,
}

/// ABC-classified aggregate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AbcAggregate {
    /// Column actually used after fallback; `None` when nothing was classified
    pub group_by: Option<Column>,
    pub a_threshold: f64,
    pub b_threshold: f64,
    pub rows: Vec<AbcRow>,
}

impl AbcAggregate {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of `value` over rows of `class`
    pub fn class_total(&self, class: AbcClass) -> f64 {
        self.rows
            .iter()
            .filter(|r| r.abc_class == class)
            .map(|r| r.value)
            .sum()
    }

    /// Number of groups in `class`
    pub fn class_count(&self, class: AbcClass) -> usize {
        self.rows.iter().filter(|r| r.abc_class == class).count()
    }
}

/// Pareto-flagged aggregate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParetoAggregate {
    pub group_by: Option<Column>,
    pub cutoff: f64,
    pub rows: Vec<ParetoRow>,
}

impl ParetoAggregate {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of `value` over frontier rows
    pub fn frontier_total(&self) -> f64 {
        self.rows
            .iter()
            .filter(|r| r.is_frontier)
            .map(|r| r.value)
            .sum()
    }

    pub fn frontier_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_frontier).count()
    }
}

/// Sums with share and cumulative share, shared by ABC and Pareto
struct CumulativeRow {
    key: String,
    value: f64,
    percentage: f64,
    cumulative_percentage: f64,
}

/// Returns the rows and whether the total was zero
fn cumulative_rows(records: &RecordSet, group_by: Column) -> (Vec<CumulativeRow>, bool) {
    let sums = grouped_sums(records, group_by);
    let total: f64 = sums.iter().map(|(_, v)| v).sum();
    let zero_total = total == 0.0;

    let mut running = 0.0;
    let rows = sums
        .into_iter()
        .map(|(key, value)| {
            running += value;
            CumulativeRow {
                key,
                value,
                percentage: round_to(safe_percentage(value, total), 1),
                cumulative_percentage: round_to(safe_percentage(running, total), 2),
            }
        })
        .collect();

    (rows, zero_total)
}

/// Pick the grouping column for ABC
///
/// The requested column wins when usable. Otherwise `category`, then
/// `entity`, then the first groupable column in schema order.
pub fn resolve_abc_column(records: &RecordSet, requested: Option<Column>) -> Option<Column> {
    let usable = |c: Column| c.is_groupable() && records.has_column(c);

    if let Some(c) = requested.filter(|c| usable(*c)) {
        return Some(c);
    }

    [Column::Category, Column::Entity]
        .into_iter()
        .chain(Column::ALL)
        .find(|c| usable(*c))
}

/// ABC classification with caller thresholds
///
/// `a_threshold < b_threshold` is assumed; it is checked once by
/// `EngineConfig::validate`, not here.
pub fn classify_abc(
    records: &RecordSet,
    group_by: Option<Column>,
    a_threshold: f64,
    b_threshold: f64,
) -> AbcAggregate {
    let empty = AbcAggregate {
        group_by: None,
        a_threshold,
        b_threshold,
        rows: Vec::new(),
    };

    if !records.has_column(Column::Value) {
        return empty;
    }

    let Some(column) = resolve_abc_column(records, group_by) else {
        debug!("No groupable column available for ABC classification");
        return empty;
    };

    if group_by.is_some_and(|requested| requested != column) {
        debug!("ABC grouping fell back to '{}'", column);
    }

    let (rows, zero_total) = cumulative_rows(records, column);
    let rows = rows
        .into_iter()
        .map(|r| {
            let (cumulative_percentage, abc_class) = if zero_total {
                (0.0, AbcClass::C)
            } else {
                (
                    r.cumulative_percentage,
                    AbcClass::assign(r.cumulative_percentage, a_threshold, b_threshold),
                )
            };
            AbcRow {
                key: r.key,
                value: r.value,
                percentage: r.percentage,
                cumulative_percentage,
                abc_class,
            }
        })
        .collect();

    AbcAggregate {
        group_by: Some(column),
        a_threshold,
        b_threshold,
        rows,
    }
}

/// ABC classification at the default 80 / 95 thresholds
pub fn classify_abc_default(records: &RecordSet, group_by: Option<Column>) -> AbcAggregate {
    classify_abc(records, group_by, DEFAULT_ABC_A_THRESHOLD, DEFAULT_ABC_B_THRESHOLD)
}

/// Pareto frontier at the fixed 80% cutoff
///
/// No fallback: an empty aggregate is returned when `group_by` is absent.
pub fn classify_pareto(records: &RecordSet, group_by: Column) -> ParetoAggregate {
    classify_pareto_with_cutoff(records, group_by, DEFAULT_PARETO_THRESHOLD)
}

/// Pareto frontier at an explicit cutoff
pub fn classify_pareto_with_cutoff(records: &RecordSet, group_by: Column, cutoff: f64) -> ParetoAggregate {
    if !group_by.is_groupable() || !records.has_column(group_by) || !records.has_column(Column::Value) {
        debug!("Column '{}' unavailable, skipping Pareto", group_by);
        return ParetoAggregate {
            group_by: None,
            cutoff,
            rows: Vec::new(),
        };
    }

    let (rows, zero_total) = cumulative_rows(records, group_by);
    let rows: Vec<ParetoRow> = rows
        .into_iter()
        .map(|r| {
            let cumulative_percentage = if zero_total { 0.0 } else { r.cumulative_percentage };
            ParetoRow {
                key: r.key,
                value: r.value,
                percentage: r.percentage,
                cumulative_percentage,
                is_frontier: !zero_total && cumulative_percentage <= cutoff,
            }
        })
        .collect();

    debug!(
        "Pareto: {} of {} '{}' groups on the {}% frontier",
        rows.iter().filter(|r| r.is_frontier).count(),
        rows.len(),
        group_by,
        cutoff
    );

    ParetoAggregate {
        group_by: Some(group_by),
        cutoff,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Record;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn entity_set(values: &[(&str, f64)]) -> RecordSet {
        values
            .iter()
            .map(|(e, v)| Record::new(day(1), *v).with_entity(*e))
            .collect()
    }

    #[test]
    fn test_assign_boundaries() {
        assert_eq!(AbcClass::assign(80.0, 80.0, 95.0), AbcClass::A);
        assert_eq!(AbcClass::assign(80.01, 80.0, 95.0), AbcClass::B);
        assert_eq!(AbcClass::assign(95.0, 80.0, 95.0), AbcClass::B);
        assert_eq!(AbcClass::assign(95.01, 80.0, 95.0), AbcClass::C);
    }

    #[test]
    fn test_two_entity_example() {
        let set = entity_set(&[("E1", 100.0), ("E2", 900.0)]);
        let abc = classify_abc_default(&set, Some(Column::Entity));

        assert_eq!(abc.group_by, Some(Column::Entity));
        assert_eq!(abc.rows[0].key, "E2");
        assert_eq!(abc.rows[0].cumulative_percentage, 90.0);
        assert_eq!(abc.rows[0].abc_class, AbcClass::B);
        assert_eq!(abc.rows[1].cumulative_percentage, 100.0);
        assert_eq!(abc.rows[1].abc_class, AbcClass::C);
        assert_eq!(abc.class_total(AbcClass::A), 0.0);
    }

    #[test]
    fn test_fallback_prefers_category() {
        let set = RecordSet::new(vec![
            Record::new(day(1), 10.0).with_entity("E1").with_category("C1"),
            Record::new(day(2), 20.0).with_entity("E2").with_category("C2"),
        ]);
        assert_eq!(resolve_abc_column(&set, None), Some(Column::Category));
        assert_eq!(classify_abc_default(&set, None).group_by, Some(Column::Category));
    }

    #[test]
    fn test_fallback_to_entity_then_date() {
        let with_entity = entity_set(&[("E1", 1.0)]);
        assert_eq!(resolve_abc_column(&with_entity, Some(Column::Category)), Some(Column::Entity));

        let dates_only = RecordSet::new(vec![Record::new(day(1), 1.0)]);
        assert_eq!(resolve_abc_column(&dates_only, None), Some(Column::Date));
    }

    #[test]
    fn test_no_groupable_column() {
        let set = RecordSet::new(vec![Record {
            date: None,
            value: 5.0,
            entity: None,
            category: None,
        }]);
        let abc = classify_abc_default(&set, None);
        assert!(abc.is_empty());
        assert_eq!(abc.group_by, None);
    }

    #[test]
    fn test_zero_total_is_all_c() {
        let set = entity_set(&[("E1", 0.0), ("E2", 0.0)]);
        let abc = classify_abc_default(&set, Some(Column::Entity));
        assert!(abc.rows.iter().all(|r| r.abc_class == AbcClass::C));
        assert!(abc.rows.iter().all(|r| r.cumulative_percentage == 0.0));

        let pareto = classify_pareto(&set, Column::Entity);
        assert_eq!(pareto.frontier_count(), 0);
    }

    #[test]
    fn test_pareto_frontier() {
        let set = entity_set(&[("E1", 50.0), ("E2", 30.0), ("E3", 15.0), ("E4", 5.0)]);
        let pareto = classify_pareto(&set, Column::Entity);

        let flags: Vec<bool> = pareto.rows.iter().map(|r| r.is_frontier).collect();
        assert_eq!(flags, vec![true, true, false, false]);
        assert_eq!(pareto.frontier_total(), 80.0);
    }

    #[test]
    fn test_pareto_has_no_fallback() {
        let set = RecordSet::new(vec![Record::new(day(1), 10.0).with_category("C1")]);
        let pareto = classify_pareto(&set, Column::Entity);
        assert!(pareto.is_empty());
        assert_eq!(pareto.group_by, None);
    }

    #[test]
    fn test_single_group_is_not_a() {
        // one group always reaches 100%
        let set = entity_set(&[("E1", 10.0)]);
        let abc = classify_abc_default(&set, Some(Column::Entity));
        assert_eq!(abc.rows[0].abc_class, AbcClass::C);
    }
}
