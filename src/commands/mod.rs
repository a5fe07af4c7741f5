//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod analyze;
pub mod insights;
pub mod utils;

// Re-export main command functions
pub use analyze::{build_scenario, execute_analyze, validate_args, validate_scenario, AnalyzeArgs};
pub use insights::{
    execute_anomalies, execute_forecast, execute_trends, validate_anomaly_method,
    validate_forecast_method, AnomaliesArgs, AnomalyKind, ForecastArgs, ForecastKind, PeriodKind,
    TrendsArgs,
};
pub use utils::{display_schema, display_version, load_input, resolve_config, validate_report_file};
