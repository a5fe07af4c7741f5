//! Heuristic insights over a record set: outlier flags and daily forecasts.

pub mod anomaly;
pub mod forecast;

pub use anomaly::{detect_anomalies, flag_values, Anomaly, AnomalyMethod, AnomalyReport};
pub use forecast::{daily_series, forecast, predict, DailyPoint, Forecast, ForecastMethod};
