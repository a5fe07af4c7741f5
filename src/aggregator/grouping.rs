//! Grouped sums and percentage shares.
//!
//! Every breakdown in the report starts here: sum `value` per group key,
//! order by sum descending, attach each group's share of the total.
//!
//! Example: records `(E1, 100)`, `(E2, 900)` grouped by entity give
//! `[(E2, 900, 90.0), (E1, 100, 10.0)]`.

use crate::records::{Column, RecordSet};
use crate::utils::rounding::{round_to, safe_percentage};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of a grouped aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedRow {
    /// Group key (entity name, category name, or ISO date)
    pub key: String,

    /// Sum of `value` over the group
    pub value: f64,

    /// Share of the total across all groups, 1 decimal
    pub percentage: f64,
}

/// Groups ordered by descending sum
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedAggregate {
    /// Column the records were grouped by; `None` when nothing was grouped
    pub group_by: Option<Column>,
    pub rows: Vec<GroupedRow>,
}

impl GroupedAggregate {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Sum over all groups
    pub fn total(&self) -> f64 {
        self.rows.iter().map(|r| r.value).sum()
    }
}

/// Sum `value` per distinct key of `group_by`
///
/// Returns `(key, sum)` pairs sorted descending by sum. Ties keep the order
/// in which keys were first seen. Records without a key for `group_by`
/// are skipped.
pub fn grouped_sums(records: &RecordSet, group_by: Column) -> Vec<(String, f64)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut sums: Vec<(String, f64)> = Vec::new();

    for record in records {
        let Some(key) = record.key(group_by) else {
            continue;
        };
        match index.get(&key) {
            Some(&i) => sums[i].1 += record.value,
            None => {
                index.insert(key.clone(), sums.len());
                sums.push((key, record.value));
            }
        }
    }

    // stable sort keeps first-encountered order among equal sums
    sums.sort_by(|a, b| b.1.total_cmp(&a.1));
    sums
}

/// Group, sum and compute percentage shares
///
/// **Public** - main entry point for breakdowns
///
/// Returns an empty aggregate when `group_by` is absent from every record
/// (or is not a groupable column) rather than failing. Shares are all zero
/// when the total is zero.
pub fn group_and_sum(records: &RecordSet, group_by: Column) -> GroupedAggregate {
    if !group_by.is_groupable() || !records.has_column(group_by) || !records.has_column(Column::Value) {
        debug!("Column '{}' unavailable, returning empty aggregate", group_by);
        return GroupedAggregate::empty();
    }

    let sums = grouped_sums(records, group_by);
    let total: f64 = sums.iter().map(|(_, v)| v).sum();

    let rows = sums
        .into_iter()
        .map(|(key, value)| GroupedRow {
            key,
            value,
            percentage: round_to(safe_percentage(value, total), 1),
        })
        .collect::<Vec<_>>();

    debug!("Grouped {} records into {} '{}' groups", records.len(), rows.len(), group_by);

    GroupedAggregate {
        group_by: Some(group_by),
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

    #[test]
    fn test_group_and_sum_orders_descending() {
        let set = RecordSet::new(vec![
            Record::new(day(1), 100.0).with_entity("E1"),
            Record::new(day(1), 900.0).with_entity("E2"),
        ]);

        let agg = group_and_sum(&set, Column::Entity);

        assert_eq!(agg.group_by, Some(Column::Entity));
        assert_eq!(agg.rows[0].key, "E2");
        assert_eq!(agg.rows[0].value, 900.0);
        assert_eq!(agg.rows[0].percentage, 90.0);
        assert_eq!(agg.rows[1].key, "E1");
        assert_eq!(agg.rows[1].percentage, 10.0);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let set = RecordSet::new(vec![
            Record::new(day(1), 5.0).with_category("zeta"),
            Record::new(day(1), 5.0).with_category("alpha"),
            Record::new(day(1), 7.0).with_category("mid"),
        ]);

        let keys: Vec<_> = group_and_sum(&set, Column::Category)
            .rows
            .into_iter()
            .map(|r| r.key)
            .collect();

        assert_eq!(keys, vec!["mid", "zeta", "alpha"]);
    }

    #[test]
    fn test_missing_column_gives_empty() {
        let set = RecordSet::new(vec![Record::new(day(1), 5.0)]);
        let agg = group_and_sum(&set, Column::Entity);
        assert!(agg.is_empty());
        assert_eq!(agg.group_by, None);
    }

    #[test]
    fn test_value_is_not_groupable() {
        let set = RecordSet::new(vec![Record::new(day(1), 5.0)]);
        assert!(group_and_sum(&set, Column::Value).is_empty());
    }

    #[test]
    fn test_zero_total_gives_zero_shares() {
        let set = RecordSet::new(vec![
            Record::new(day(1), 0.0).with_entity("E1"),
            Record::new(day(2), 0.0).with_entity("E2"),
        ]);

        let agg = group_and_sum(&set, Column::Entity);
        assert_eq!(agg.len(), 2);
        assert!(agg.rows.iter().all(|r| r.percentage == 0.0));
    }

    #[test]
    fn test_group_by_date() {
        let set = RecordSet::new(vec![
            Record::new(day(1), 1.0),
            Record::new(day(2), 3.0),
            Record::new(day(1), 1.0),
        ]);

        let agg = group_and_sum(&set, Column::Date);
        assert_eq!(agg.rows[0].key, "2024-01-02");
        assert_eq!(agg.rows[1].value, 2.0);
    }

    #[test]
    fn test_records_without_key_are_skipped() {
        let set = RecordSet::new(vec![
            Record::new(day(1), 10.0).with_entity("E1"),
            Record::new(day(1), 90.0),
        ]);

        let agg = group_and_sum(&set, Column::Entity);
        assert_eq!(agg.len(), 1);
        assert_eq!(agg.rows[0].percentage, 100.0);
    }
}
