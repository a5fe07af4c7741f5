//! Loss Sentinel CLI
//!
//! Loss and sales analytics for tabular business records.
//! Computes breakdowns, ABC/Pareto classes and what-if savings from a CSV file.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use loss_sentinel::commands::{
    display_schema, display_version, execute_analyze, execute_anomalies, execute_forecast,
    execute_trends, validate_anomaly_method, validate_args, validate_forecast_method,
    validate_report_file, AnalyzeArgs, AnomaliesArgs, AnomalyKind, ForecastArgs, ForecastKind,
    PeriodKind, TrendsArgs,
};
use loss_sentinel::records::FilterState;
use loss_sentinel::utils::config::{MappingOverrides, CONFIG_ENV_VAR};

/// Loss Sentinel - metrics and what-if savings for loss/sales data
#[derive(Parser, Debug)]
#[command(name = "loss-sentinel")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Explicit header names, overriding auto-detection
#[derive(clap::Args, Debug, Clone, Default)]
struct MappingFlags {
    /// Header of the date column
    #[arg(long)]
    date_column: Option<String>,

    /// Header of the value column
    #[arg(long)]
    value_column: Option<String>,

    /// Header of the entity column
    #[arg(long)]
    entity_column: Option<String>,

    /// Header of the category column
    #[arg(long)]
    category_column: Option<String>,
}

impl From<MappingFlags> for MappingOverrides {
    fn from(flags: MappingFlags) -> Self {
        MappingOverrides {
            date: flags.date_column,
            value: flags.value_column,
            entity: flags.entity_column,
            category: flags.category_column,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the metrics report for a CSV file
    Analyze {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// TOML config file
        #[arg(short, long, env = CONFIG_ENV_VAR)]
        config: Option<PathBuf>,

        /// JSON file with scenario parameters
        #[arg(long)]
        scenario: Option<PathBuf>,

        /// Output path for the JSON report
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Directory for CSV export sheets (optional)
        #[arg(short, long)]
        export_dir: Option<PathBuf>,

        /// Keep only these entities (repeatable)
        #[arg(long = "entity")]
        entities: Vec<String>,

        /// Keep only these categories (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,

        /// First date to include (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,

        /// Last date to include (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,

        /// Reduction on the A-class subtotal, percent
        #[arg(long)]
        reduce_a: Option<f64>,

        /// Reduction on peak-period value, percent
        #[arg(long)]
        reduce_peak: Option<f64>,

        /// Reduction on the Pareto frontier subtotal, percent
        #[arg(long)]
        reduce_frontier: Option<f64>,

        /// Considered investment amount
        #[arg(long)]
        investment: Option<f64>,

        #[command(flatten)]
        mapping: MappingFlags,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Flag outlying records
    Anomalies {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// TOML config file
        #[arg(short, long, env = CONFIG_ENV_VAR)]
        config: Option<PathBuf>,

        /// Detection rule
        #[arg(short, long, value_enum, default_value = "zscore")]
        method: AnomalyKind,

        /// Z-score threshold, IQR multiplier or percentile
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Rows to print
        #[arg(long, default_value = "20")]
        limit: usize,

        #[command(flatten)]
        mapping: MappingFlags,
    },

    /// Forecast the daily value series
    Forecast {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// TOML config file
        #[arg(short, long, env = CONFIG_ENV_VAR)]
        config: Option<PathBuf>,

        /// Forecast method
        #[arg(short, long, value_enum, default_value = "moving-average")]
        method: ForecastKind,

        /// Days to forecast
        #[arg(short, long)]
        days: Option<u32>,

        /// Moving average window in days
        #[arg(long)]
        window: Option<usize>,

        /// Exponential smoothing factor
        #[arg(long)]
        alpha: Option<f64>,

        #[command(flatten)]
        mapping: MappingFlags,
    },

    /// Value per day, week or month plus weekday totals
    Trends {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// TOML config file
        #[arg(short, long, env = CONFIG_ENV_VAR)]
        config: Option<PathBuf>,

        /// Bucket width
        #[arg(short, long, value_enum, default_value = "day")]
        period: PeriodKind,

        #[command(flatten)]
        mapping: MappingFlags,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Analyze {
            input,
            config,
            scenario,
            output,
            export_dir,
            entities,
            categories,
            from,
            to,
            reduce_a,
            reduce_peak,
            reduce_frontier,
            investment,
            mapping,
            summary,
        } => {
            let args = AnalyzeArgs {
                input,
                config,
                scenario_file: scenario,
                output_json: output,
                export_dir,
                filter: FilterState {
                    entities,
                    categories,
                    date_range: from.zip(to),
                },
                reduce_a,
                reduce_peak,
                reduce_frontier,
                investment,
                mapping: mapping.into(),
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Anomalies {
            input,
            config,
            method,
            threshold,
            limit,
            mapping,
        } => {
            let method = method.to_method(threshold);
            validate_anomaly_method(&method)?;

            execute_anomalies(AnomaliesArgs {
                input,
                config,
                method,
                mapping: mapping.into(),
                limit,
            })?;
        }

        Commands::Forecast {
            input,
            config,
            method,
            days,
            window,
            alpha,
            mapping,
        } => {
            let method = method.to_method(window, alpha);
            validate_forecast_method(&method, days)?;

            execute_forecast(ForecastArgs {
                input,
                config,
                method,
                days,
                mapping: mapping.into(),
            })?;
        }

        Commands::Trends {
            input,
            config,
            period,
            mapping,
        } => {
            execute_trends(TrendsArgs {
                input,
                config,
                granularity: period.into(),
                mapping: mapping.into(),
            })?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
