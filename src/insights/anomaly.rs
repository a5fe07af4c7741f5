//! Statistical outlier flags over record values.
//!
//! These are simple heuristics for spotting unusual records, not a
//! calibrated detection model. All three methods look at `value` alone.

use crate::records::{Record, RecordSet};
use crate::utils::rounding::{round_to, safe_percentage};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_ZSCORE_THRESHOLD: f64 = 3.0;
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;
pub const DEFAULT_PERCENTILE: f64 = 95.0;

/// Outlier rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum AnomalyMethod {
    /// `|x - mean| / std > threshold`, sample std
    ZScore { threshold: f64 },

    /// Outside `[Q1 - m*IQR, Q3 + m*IQR]`
    Iqr { multiplier: f64 },

    /// Strictly above the given percentile
    Percentile { percentile: f64 },
}

impl AnomalyMethod {
    pub fn zscore() -> Self {
        AnomalyMethod::ZScore {
            threshold: DEFAULT_ZSCORE_THRESHOLD,
        }
    }

    pub fn iqr() -> Self {
        AnomalyMethod::Iqr {
            multiplier: DEFAULT_IQR_MULTIPLIER,
        }
    }

    pub fn percentile() -> Self {
        AnomalyMethod::Percentile {
            percentile: DEFAULT_PERCENTILE,
        }
    }
}

impl fmt::Display for AnomalyMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyMethod::ZScore { threshold } => write!(f, "z-score > {}", threshold),
            AnomalyMethod::Iqr { multiplier } => write!(f, "IQR x {}", multiplier),
            AnomalyMethod::Percentile { percentile } => write!(f, "above p{}", percentile),
        }
    }
}

/// A flagged record and its position in the input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub index: usize,
    pub record: Record,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub method: AnomalyMethod,
    pub total_records: usize,
    pub anomaly_count: usize,
    /// Flagged share of records, percent, 1 decimal
    pub anomaly_share: f64,
    /// Flagged records, highest value first
    pub anomalies: Vec<Anomaly>,
}

/// Flag outlying records in `records` using `method`
///
/// Empty input gives a report with zero counts.
pub fn detect_anomalies(records: &RecordSet, method: AnomalyMethod) -> AnomalyReport {
    let values: Vec<f64> = records.iter().map(|r| r.value).collect();
    let flags = flag_values(&values, method);

    let mut anomalies: Vec<Anomaly> = records
        .iter()
        .zip(&flags)
        .enumerate()
        .filter(|(_, (_, flagged))| **flagged)
        .map(|(index, (record, _))| Anomaly {
            index,
            record: record.clone(),
        })
        .collect();
    anomalies.sort_by(|a, b| b.record.value.total_cmp(&a.record.value));

    let total = values.len();
    let count = anomalies.len();

    debug!("{}: {} of {} records flagged", method, count, total);

    AnomalyReport {
        method,
        total_records: total,
        anomaly_count: count,
        anomaly_share: round_to(safe_percentage(count as f64, total as f64), 1),
        anomalies,
    }
}

/// Per-value outlier flags, same length as `values`
pub fn flag_values(values: &[f64], method: AnomalyMethod) -> Vec<bool> {
    if values.is_empty() {
        return Vec::new();
    }

    match method {
        AnomalyMethod::ZScore { threshold } => {
            let Some((mean, std)) = mean_and_sample_std(values) else {
                return vec![false; values.len()];
            };
            if std == 0.0 {
                return vec![false; values.len()];
            }
            values
                .iter()
                .map(|v| ((v - mean) / std).abs() > threshold)
                .collect()
        }
        AnomalyMethod::Iqr { multiplier } => {
            let sorted = sorted_copy(values);
            let (Some(q1), Some(q3)) = (
                percentile_of_sorted(&sorted, 25.0),
                percentile_of_sorted(&sorted, 75.0),
            ) else {
                return vec![false; values.len()];
            };
            let iqr = q3 - q1;
            let (low, high) = (q1 - multiplier * iqr, q3 + multiplier * iqr);
            values.iter().map(|v| *v < low || *v > high).collect()
        }
        AnomalyMethod::Percentile { percentile } => {
            let Some(cutoff) = percentile_of_sorted(&sorted_copy(values), percentile) else {
                return vec![false; values.len()];
            };
            values.iter().map(|v| *v > cutoff).collect()
        }
    }
}

/// Mean and sample standard deviation; `None` below two values
fn mean_and_sample_std(values: &[f64]) -> Option<(f64, f64)> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some((mean, var.sqrt()))
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Linear-interpolated percentile of ascending `sorted`
///
/// `p` is clamped to `[0, 100]`. `None` for an empty slice.
pub fn percentile_of_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = p.clamp(0.0, 100.0) / 100.0 * last as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64))
}
