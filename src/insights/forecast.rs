//! Short-horizon forecasts of the daily value series.
//!
//! The daily series is the per-date sum of `value`, ascending by date.
//! Forecasts need at least two weeks of distinct dates; shorter histories
//! return `Forecast::InsufficientHistory` instead of a guess.

use crate::records::{Column, RecordSet};
use crate::utils::config::{MAX_FORECAST_HORIZON_DAYS, MIN_FORECAST_HISTORY_DAYS};
use chrono::{Days, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_MA_WINDOW: usize = 7;
pub const DEFAULT_ALPHA: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ForecastMethod {
    /// Flat at the mean of the last `window` days
    MovingAverage { window: usize },

    /// Flat at the last exponentially smoothed value
    ExponentialSmoothing { alpha: f64 },

    /// Least-squares line over the day index
    LinearTrend,
}

impl ForecastMethod {
    pub fn moving_average() -> Self {
        ForecastMethod::MovingAverage {
            window: DEFAULT_MA_WINDOW,
        }
    }

    pub fn exponential() -> Self {
        ForecastMethod::ExponentialSmoothing {
            alpha: DEFAULT_ALPHA,
        }
    }
}

/// One observed or predicted day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Forecast {
    /// Fewer distinct dates than the forecast needs
    InsufficientHistory { days: usize },

    Ready {
        method: ForecastMethod,
        history: Vec<DailyPoint>,
        points: Vec<DailyPoint>,
    },
}

impl Forecast {
    pub fn points(&self) -> &[DailyPoint] {
        match self {
            Forecast::InsufficientHistory { .. } => &[],
            Forecast::Ready { points, .. } => points,
        }
    }
}

/// Per-date totals, ascending by date
pub fn daily_series(records: &RecordSet) -> Vec<DailyPoint> {
    if !records.has_column(Column::Date) {
        return Vec::new();
    }

    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records {
        if let Some(date) = record.date {
            *totals.entry(date).or_insert(0.0) += record.value;
        }
    }

    totals
        .into_iter()
        .map(|(date, value)| DailyPoint { date, value })
        .collect()
}

/// Forecast `horizon` days past the last observed date
///
/// The horizon is capped at `MAX_FORECAST_HORIZON_DAYS`.
pub fn forecast(records: &RecordSet, method: ForecastMethod, horizon: u32) -> Forecast {
    let horizon = horizon.min(MAX_FORECAST_HORIZON_DAYS);
    let history = daily_series(records);
    if history.len() < MIN_FORECAST_HISTORY_DAYS {
        debug!(
            "Forecast needs {} days, have {}",
            MIN_FORECAST_HISTORY_DAYS,
            history.len()
        );
        return Forecast::InsufficientHistory {
            days: history.len(),
        };
    }

    let values: Vec<f64> = history.iter().map(|p| p.value).collect();
    let predicted = predict(&values, method, horizon as usize);

    let last = history[history.len() - 1].date;
    let points = predicted
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| {
            last.checked_add_days(Days::new(i as u64 + 1))
                .map(|date| DailyPoint { date, value })
        })
        .collect();

    Forecast::Ready {
        method,
        history,
        points,
    }
}

/// Predicted values for `horizon` steps after `values`
///
/// Empty `values` give no predictions.
pub fn predict(values: &[f64], method: ForecastMethod, horizon: usize) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    match method {
        ForecastMethod::MovingAverage { window } => {
            let window = window.clamp(1, values.len());
            let tail = &values[values.len() - window..];
            let level = tail.iter().sum::<f64>() / window as f64;
            vec![level; horizon]
        }
        ForecastMethod::ExponentialSmoothing { alpha } => {
            let level = values[1..]
                .iter()
                .fold(values[0], |s, x| alpha * x + (1.0 - alpha) * s);
            vec![level; horizon]
        }
        ForecastMethod::LinearTrend => {
            let (slope, intercept) = least_squares(values);
            let n = values.len();
            (n..n + horizon)
                .map(|x| slope * x as f64 + intercept)
                .collect()
        }
    }
}

/// Slope and intercept of the least-squares line through `(i, values[i])`
fn least_squares(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n;

    let (num, den) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, y)| {
            let dx = i as f64 - mean_x;
            (num + dx * (y - mean_y), den + dx * dx)
        });

    let slope = if den == 0.0 { 0.0 } else { num / den };
    (slope, mean_y - slope * mean_x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Record;

    fn series(values: &[f64]) -> RecordSet {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Record::new(start + Days::new(i as u64), *v))
            .collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_insufficient_history() {
        let set = series(&[1.0; 13]);
        assert_eq!(
            forecast(&set, ForecastMethod::LinearTrend, 30),
            Forecast::InsufficientHistory { days: 13 }
        );
    }

    #[test]
    fn test_daily_series_sums_and_sorts() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let set = RecordSet::new(vec![
            Record::new(d(3), 1.0),
            Record::new(d(1), 2.0),
            Record::new(d(3), 4.0),
        ]);
        let daily = daily_series(&set);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0], DailyPoint { date: d(1), value: 2.0 });
        assert_eq!(daily[1], DailyPoint { date: d(3), value: 5.0 });
    }

    #[test]
    fn test_moving_average() {
        let values: Vec<f64> = (1..=14).map(f64::from).collect();
        let out = predict(&values, ForecastMethod::moving_average(), 3);
        // mean of 8..=14
        assert_eq!(out, vec![11.0, 11.0, 11.0]);
    }

    #[test]
    fn test_exponential_smoothing() {
        let out = predict(&[10.0, 20.0], ForecastMethod::exponential(), 2);
        // 0.3 * 20 + 0.7 * 10
        assert!(approx(out[0], 13.0));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_linear_trend_extends_line() {
        let values: Vec<f64> = (0..14).map(|i| 2.0 * i as f64 + 5.0).collect();
        let out = predict(&values, ForecastMethod::LinearTrend, 2);
        assert!(approx(out[0], 33.0));
        assert!(approx(out[1], 35.0));
    }

    #[test]
    fn test_horizon_is_capped() {
        let set = series(&[3.0; 14]);
        let result = forecast(&set, ForecastMethod::LinearTrend, 4_000_000_000);
        assert_eq!(result.points().len(), MAX_FORECAST_HORIZON_DAYS as usize);
    }

    #[test]
    fn test_daily_series_skips_undated_records() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let mut undated = Record::new(d, 100.0);
        undated.date = None;
        let set = RecordSet::new(vec![Record::new(d, 1.0), undated, Record::new(d, 2.0)]);
        assert_eq!(daily_series(&set), vec![DailyPoint { date: d, value: 3.0 }]);
    }

    #[test]
    fn test_forecast_dates_follow_history() {
        let set = series(&[3.0; 14]);
        let result = forecast(&set, ForecastMethod::moving_average(), 5);
        let points = result.points();
        assert_eq!(points.len(), 5);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(points[4].date, NaiveDate::from_ymd_opt(2024, 1, 19).unwrap());
        assert_eq!(points[0].value, 3.0);
    }
}
