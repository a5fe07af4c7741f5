//! Peak-period detection.
//!
//! Peak periods are the highest-value calendar days: the top
//! `top_fraction` share of distinct dates, never fewer than one.

use super::grouping::grouped_sums;
use crate::records::{Column, RecordSet};
use crate::utils::config::DEFAULT_PEAK_FRACTION;
use log::debug;

/// Number of dates selected out of `count` distinct dates
///
/// `floor(count * top_fraction)`, raised to 1 when there is at least one
/// date. Zero only when `count` is zero.
pub fn peak_count(count: usize, top_fraction: f64) -> usize {
    if count == 0 {
        return 0;
    }
    let selected = (count as f64 * top_fraction).floor() as usize;
    selected.clamp(1, count)
}

/// Sum of `value` over the top `top_fraction` of dates by daily total
///
/// Returns 0 when the record set has no dates.
pub fn peak_value(records: &RecordSet, top_fraction: f64) -> f64 {
    if !records.has_column(Column::Date) || !records.has_column(Column::Value) {
        return 0.0;
    }

    let daily = grouped_sums(records, Column::Date);
    let take = peak_count(daily.len(), top_fraction);

    let value: f64 = daily.iter().take(take).map(|(_, v)| v).sum();

    debug!(
        "Peak: top {} of {} days sum to {:.2}",
        take,
        daily.len(),
        value
    );

    value
}

/// Peak value at the default 20% fraction
pub fn peak_value_default(records: &RecordSet) -> f64 {
    peak_value(records, DEFAULT_PEAK_FRACTION)
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
    fn test_peak_count_lower_bound() {
        assert_eq!(peak_count(0, 0.2), 0);
        assert_eq!(peak_count(1, 0.2), 1);
        assert_eq!(peak_count(4, 0.2), 1);
        assert_eq!(peak_count(10, 0.2), 2);
        assert_eq!(peak_count(14, 0.2), 2);
        assert_eq!(peak_count(3, 1.0), 3);
    }

    #[test]
    fn test_single_day_peak_is_total() {
        let set = RecordSet::new(vec![
            Record::new(day(1), 100.0).with_entity("E1"),
            Record::new(day(1), 900.0).with_entity("E2"),
        ]);
        assert_eq!(peak_value_default(&set), 1000.0);
    }

    #[test]
    fn test_peak_picks_highest_days() {
        let set: RecordSet = (1..=10)
            .map(|d| Record::new(day(d), d as f64 * 10.0))
            .collect();
        // top 2 of 10 days: 100 + 90
        assert_eq!(peak_value_default(&set), 190.0);
    }

    #[test]
    fn test_peak_without_dates() {
        let set = RecordSet::new(vec![Record {
            date: None,
            value: 5.0,
            entity: None,
            category: None,
        }]);
        assert_eq!(peak_value_default(&set), 0.0);
        assert_eq!(peak_value_default(&RecordSet::empty()), 0.0);
    }
}
