//! Anomalies, forecast and trends commands.

use super::utils::{load_input, merge_overrides, resolve_config};
use crate::aggregator::{entity_statistics, period_series, weekday_totals, Granularity};
use crate::insights::anomaly::{DEFAULT_IQR_MULTIPLIER, DEFAULT_PERCENTILE, DEFAULT_ZSCORE_THRESHOLD};
use crate::insights::forecast::{DEFAULT_ALPHA, DEFAULT_MA_WINDOW};
use crate::insights::{detect_anomalies, forecast, AnomalyMethod, Forecast, ForecastMethod};
use crate::utils::config::{MappingOverrides, MAX_FORECAST_HORIZON_DAYS, MIN_FORECAST_HISTORY_DAYS};
use anyhow::Result;
use clap::ValueEnum;
use log::info;
use std::path::PathBuf;

/// Anomaly rule selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AnomalyKind {
    #[value(name = "zscore")]
    ZScore,
    Iqr,
    Percentile,
}

impl AnomalyKind {
    /// Build the method, `parameter` replacing the default threshold
    pub fn to_method(self, parameter: Option<f64>) -> AnomalyMethod {
        match self {
            AnomalyKind::ZScore => AnomalyMethod::ZScore {
                threshold: parameter.unwrap_or(DEFAULT_ZSCORE_THRESHOLD),
            },
            AnomalyKind::Iqr => AnomalyMethod::Iqr {
                multiplier: parameter.unwrap_or(DEFAULT_IQR_MULTIPLIER),
            },
            AnomalyKind::Percentile => AnomalyMethod::Percentile {
                percentile: parameter.unwrap_or(DEFAULT_PERCENTILE),
            },
        }
    }
}

/// Forecast method selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ForecastKind {
    MovingAverage,
    Exponential,
    Trend,
}

impl ForecastKind {
    pub fn to_method(self, window: Option<usize>, alpha: Option<f64>) -> ForecastMethod {
        match self {
            ForecastKind::MovingAverage => ForecastMethod::MovingAverage {
                window: window.unwrap_or(DEFAULT_MA_WINDOW),
            },
            ForecastKind::Exponential => ForecastMethod::ExponentialSmoothing {
                alpha: alpha.unwrap_or(DEFAULT_ALPHA),
            },
            ForecastKind::Trend => ForecastMethod::LinearTrend,
        }
    }
}

/// Bucket width selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PeriodKind {
    Day,
    Week,
    Month,
}

impl From<PeriodKind> for Granularity {
    fn from(kind: PeriodKind) -> Self {
        match kind {
            PeriodKind::Day => Granularity::Day,
            PeriodKind::Week => Granularity::Week,
            PeriodKind::Month => Granularity::Month,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnomaliesArgs {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub method: AnomalyMethod,
    pub mapping: MappingOverrides,
    /// Rows shown in the anomaly and entity tables
    pub limit: usize,
}

#[derive(Debug, Clone)]
pub struct ForecastArgs {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub method: ForecastMethod,
    /// Horizon in days; config value when `None`
    pub days: Option<u32>,
    pub mapping: MappingOverrides,
}

#[derive(Debug, Clone)]
pub struct TrendsArgs {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub granularity: Granularity,
    pub mapping: MappingOverrides,
}

/// Check thresholds and horizons before running an insight command
pub fn validate_anomaly_method(method: &AnomalyMethod) -> Result<()> {
    match *method {
        AnomalyMethod::ZScore { threshold } if threshold <= 0.0 => {
            anyhow::bail!("z-score threshold must be positive, got {}", threshold)
        }
        AnomalyMethod::Iqr { multiplier } if multiplier < 0.0 => {
            anyhow::bail!("IQR multiplier cannot be negative, got {}", multiplier)
        }
        AnomalyMethod::Percentile { percentile } if !(0.0..=100.0).contains(&percentile) => {
            anyhow::bail!("percentile must be between 0 and 100, got {}", percentile)
        }
        _ => Ok(()),
    }
}

pub fn validate_forecast_method(method: &ForecastMethod, days: Option<u32>) -> Result<()> {
    match *method {
        ForecastMethod::MovingAverage { window } if window == 0 => {
            anyhow::bail!("moving average window must be at least 1")
        }
        ForecastMethod::ExponentialSmoothing { alpha } if !(alpha > 0.0 && alpha <= 1.0) => {
            anyhow::bail!("alpha must be in (0, 1], got {}", alpha)
        }
        _ => {}
    }

    if let Some(days) = days {
        if !(1..=MAX_FORECAST_HORIZON_DAYS).contains(&days) {
            anyhow::bail!(
                "forecast horizon must be between 1 and {} days, got {}",
                MAX_FORECAST_HORIZON_DAYS,
                days
            );
        }
    }
    Ok(())
}

/// Flag outlying records and print per-entity statistics
pub fn execute_anomalies(args: AnomaliesArgs) -> Result<()> {
    let config = resolve_config(args.config.as_deref())?;
    let records = load_input(&args.input, &merge_overrides(&args.mapping, &config.mapping))?;

    info!("Detecting anomalies ({})", args.method);
    let report = detect_anomalies(&records, args.method);

    println!("\nAnomalies ({})", report.method);
    println!("{}", "-".repeat(51));
    println!("Records:   {}", report.total_records);
    println!("Anomalies: {}", report.anomaly_count);
    println!("Share:     {:.1}%", report.anomaly_share);

    if !report.anomalies.is_empty() {
        println!();
        for anomaly in report.anomalies.iter().take(args.limit) {
            let r = &anomaly.record;
            println!(
                "  #{:<6} {} {:>14.2} {} {}",
                anomaly.index,
                r.date.map(|d| d.to_string()).unwrap_or_default(),
                r.value,
                r.entity.as_deref().unwrap_or("-"),
                r.category.as_deref().unwrap_or("-"),
            );
        }
    }

    let stats = entity_statistics(&records);
    if !stats.is_empty() {
        println!("\nEntities by total");
        println!("{}", "-".repeat(51));
        println!("  {:<20} {:>12} {:>10} {:>6}", "entity", "sum", "mean", "count");
        for s in stats.iter().take(args.limit) {
            println!(
                "  {:<20} {:>12.0} {:>10.0} {:>6}",
                s.key, s.sum, s.mean, s.count
            );
        }
    }

    Ok(())
}

/// Forecast the daily series and print the predicted points
pub fn execute_forecast(args: ForecastArgs) -> Result<()> {
    let config = resolve_config(args.config.as_deref())?;
    let records = load_input(&args.input, &merge_overrides(&args.mapping, &config.mapping))?;

    let horizon = args.days.unwrap_or(config.analytics.forecast_days);
    info!("Forecasting {} days ahead", horizon);

    match forecast(&records, args.method, horizon) {
        Forecast::InsufficientHistory { days } => {
            println!(
                "Not enough history: {} days of data, at least {} needed",
                days, MIN_FORECAST_HISTORY_DAYS
            );
        }
        Forecast::Ready {
            method,
            history,
            points,
        } => {
            println!("\nForecast ({:?}) from {} days of history", method, history.len());
            println!("{}", "-".repeat(51));
            for p in &points {
                println!("  {} {:>14.2}", p.date, p.value);
            }
        }
    }

    Ok(())
}

/// Print the period series and the weekday breakdown
pub fn execute_trends(args: TrendsArgs) -> Result<()> {
    let config = resolve_config(args.config.as_deref())?;
    let records = load_input(&args.input, &merge_overrides(&args.mapping, &config.mapping))?;

    info!("Building {} series", args.granularity);
    let series = period_series(&records, args.granularity);

    println!("\nValue by {}", args.granularity);
    println!("{}", "-".repeat(51));
    for p in &series {
        println!("  {} {:>14.2}", p.start, p.value);
    }

    let weekdays = weekday_totals(&records);
    if !weekdays.is_empty() {
        println!("\nValue by weekday");
        println!("{}", "-".repeat(51));
        for w in &weekdays {
            println!("  {:<4} {:>14.2} {:>6.1}%", w.weekday, w.value, w.percentage);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anomaly_kind_defaults() {
        assert_eq!(AnomalyKind::ZScore.to_method(None), AnomalyMethod::zscore());
        assert_eq!(
            AnomalyKind::Iqr.to_method(Some(3.0)),
            AnomalyMethod::Iqr { multiplier: 3.0 }
        );
    }

    #[test]
    fn test_forecast_kind_defaults() {
        assert_eq!(
            ForecastKind::MovingAverage.to_method(None, Some(0.9)),
            ForecastMethod::moving_average()
        );
        assert_eq!(ForecastKind::Trend.to_method(Some(3), None), ForecastMethod::LinearTrend);
    }

    #[test]
    fn test_period_kind_maps_to_granularity() {
        assert_eq!(Granularity::from(PeriodKind::Week), Granularity::Week);
        assert_eq!(Granularity::from(PeriodKind::Month), Granularity::Month);
    }

    #[test]
    fn test_execute_trends_reads_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.csv");
        std::fs::write(&input, "Date,Amount\n2024-03-03,5\n2024-03-04,10\n").unwrap();

        let args = TrendsArgs {
            input,
            config: None,
            granularity: Granularity::Week,
            mapping: MappingOverrides::default(),
        };
        assert!(execute_trends(args).is_ok());
    }

    #[test]
    fn test_validate_methods() {
        assert!(validate_anomaly_method(&AnomalyMethod::zscore()).is_ok());
        assert!(validate_anomaly_method(&AnomalyMethod::Percentile { percentile: 120.0 }).is_err());
        assert!(validate_forecast_method(&ForecastMethod::exponential(), Some(30)).is_ok());
        assert!(validate_forecast_method(&ForecastMethod::ExponentialSmoothing { alpha: 0.0 }, None).is_err());
        assert!(validate_forecast_method(&ForecastMethod::LinearTrend, Some(0)).is_err());
        assert!(validate_forecast_method(&ForecastMethod::LinearTrend, Some(90)).is_ok());
        assert!(validate_forecast_method(&ForecastMethod::LinearTrend, Some(91)).is_err());
        assert!(validate_forecast_method(&ForecastMethod::LinearTrend, Some(4_000_000_000)).is_err());
    }
}
