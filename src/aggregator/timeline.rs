//! Value over time: period buckets and weekday totals.
//!
//! Buckets are keyed by their first day. Weeks start on Monday and months
//! on the 1st, so `2024-03-03` (a Sunday) falls in the week of `2024-02-26`
//! and the month of `2024-03-01`.

use crate::records::RecordSet;
use crate::utils::rounding::{round_to, safe_percentage};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Bucket width of a period series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    #[default]
    Day,
    Week,
    Month,
}

impl Granularity {
    /// First day of the bucket holding `date`
    pub fn bucket_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Week => date
                .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
                .unwrap_or(date),
            Granularity::Month => date.with_day(1).unwrap_or(date),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Day => write!(f, "day"),
            Granularity::Week => write!(f, "week"),
            Granularity::Month => write!(f, "month"),
        }
    }
}

/// Total value of one bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodPoint {
    /// First day of the bucket
    pub start: NaiveDate,
    pub value: f64,
}

/// Total value on one day of the week
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekdayTotal {
    pub weekday: Weekday,
    pub value: f64,
    /// Share of the dated total, 1 decimal
    pub percentage: f64,
}

/// Sum `value` per bucket, ascending by bucket start
///
/// Only buckets that hold at least one record appear. Undated records are
/// skipped.
pub fn period_series(records: &RecordSet, granularity: Granularity) -> Vec<PeriodPoint> {
    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records {
        if let Some(date) = record.date {
            *buckets.entry(granularity.bucket_start(date)).or_insert(0.0) += record.value;
        }
    }

    debug!("{} {} buckets", buckets.len(), granularity);

    buckets
        .into_iter()
        .map(|(start, value)| PeriodPoint { start, value })
        .collect()
}

/// Sum `value` per weekday, always seven rows from Monday to Sunday
///
/// Weekdays with no records carry zero. Empty when no record is dated.
pub fn weekday_totals(records: &RecordSet) -> Vec<WeekdayTotal> {
    let mut sums = [0.0f64; 7];
    let mut dated = false;
    for record in records {
        if let Some(date) = record.date {
            sums[date.weekday().num_days_from_monday() as usize] += record.value;
            dated = true;
        }
    }
    if !dated {
        return Vec::new();
    }

    let total: f64 = sums.iter().sum();
    let mut weekday = Weekday::Mon;
    let mut rows = Vec::with_capacity(7);
    for value in sums {
        rows.push(WeekdayTotal {
            weekday,
            value,
            percentage: round_to(safe_percentage(value, total), 1),
        });
        weekday = weekday.succ();
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Record;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_starts_on_monday() {
        // Sunday and the following Monday land in different weeks
        assert_eq!(Granularity::Week.bucket_start(date(2024, 3, 3)), date(2024, 2, 26));
        assert_eq!(Granularity::Week.bucket_start(date(2024, 3, 4)), date(2024, 3, 4));
        // weeks cross year boundaries
        assert_eq!(Granularity::Week.bucket_start(date(2025, 1, 1)), date(2024, 12, 30));
    }

    #[test]
    fn test_month_bucket_start() {
        assert_eq!(Granularity::Month.bucket_start(date(2024, 2, 29)), date(2024, 2, 1));
        assert_eq!(Granularity::Month.bucket_start(date(2024, 3, 1)), date(2024, 3, 1));
        assert_eq!(Granularity::Day.bucket_start(date(2024, 3, 9)), date(2024, 3, 9));
    }

    #[test]
    fn test_period_series_buckets() {
        let set = RecordSet::new(vec![
            Record::new(date(2024, 3, 4), 10.0),
            Record::new(date(2024, 2, 29), 1.0),
            Record::new(date(2024, 3, 3), 5.0),
            Record::new(date(2024, 3, 10), 2.0),
        ]);

        let weeks: Vec<(NaiveDate, f64)> = period_series(&set, Granularity::Week)
            .iter()
            .map(|p| (p.start, p.value))
            .collect();
        assert_eq!(
            weeks,
            vec![(date(2024, 2, 26), 6.0), (date(2024, 3, 4), 12.0)]
        );

        let months: Vec<(NaiveDate, f64)> = period_series(&set, Granularity::Month)
            .iter()
            .map(|p| (p.start, p.value))
            .collect();
        assert_eq!(months, vec![(date(2024, 2, 1), 1.0), (date(2024, 3, 1), 17.0)]);

        assert_eq!(period_series(&set, Granularity::Day).len(), 4);
    }

    #[test]
    fn test_weekday_totals_order_and_gaps() {
        let set = RecordSet::new(vec![
            Record::new(date(2024, 3, 3), 30.0), // Sunday
            Record::new(date(2024, 3, 4), 60.0), // Monday
            Record::new(date(2024, 3, 11), 10.0), // Monday
        ]);

        let totals = weekday_totals(&set);
        assert_eq!(totals.len(), 7);
        assert_eq!(totals[0].weekday, Weekday::Mon);
        assert_eq!(totals[0].value, 70.0);
        assert_eq!(totals[0].percentage, 70.0);
        assert_eq!(totals[2].value, 0.0);
        assert_eq!(totals[6].weekday, Weekday::Sun);
        assert_eq!(totals[6].percentage, 30.0);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(period_series(&RecordSet::empty(), Granularity::Month).is_empty());
        assert!(weekday_totals(&RecordSet::empty()).is_empty());
    }
}
