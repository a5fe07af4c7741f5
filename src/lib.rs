//! Loss Sentinel
//!
//! Metrics engine for tabular business records (losses, sales, costs):
//! totals, category/entity breakdowns, ABC classification, Pareto
//! concentration, peak periods and what-if savings projections.
//!
//! This crate provides the core implementation for the
//! `loss-sentinel` CLI tool.
//!
//! ## Getting Started
//!
//! ```ignore
//! use loss_sentinel::records::{load_records_file, ColumnMapping};
//! use loss_sentinel::report::calculate_all_metrics;
//! use loss_sentinel::scenario::ScenarioParameters;
//! use loss_sentinel::utils::config::AnalyticsConfig;
//!
//! let mapping = ColumnMapping::auto_detect(&["date", "store", "category", "amount"]);
//! let records = load_records_file("losses.csv", &mapping)?;
//! let report = calculate_all_metrics(&records, &ScenarioParameters::default(), &AnalyticsConfig::default());
//! println!("annual savings: {}", report.savings.annual);
//! ```

pub mod aggregator;
pub mod commands;
pub mod insights;
pub mod output;
pub mod records;
pub mod report;
pub mod scenario;
pub mod utils;
