//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Loads configuration
//! 2. Reads and maps the input table
//! 3. Applies filters
//! 4. Builds scenario parameters
//! 5. Computes the metrics report
//! 6. Writes output files

use super::utils::{load_input, merge_overrides, resolve_config};
use crate::output::{render_summary, write_report, write_sheets, ReportDocument};
use crate::records::{apply_filters, FilterState};
use crate::report::{calculate_all_metrics, export_workbook};
use crate::scenario::ScenarioParameters;
use crate::utils::config::{EngineConfig, MappingOverrides};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Input CSV file
    pub input: PathBuf,

    /// Optional TOML config
    pub config: Option<PathBuf>,

    /// Optional JSON file with scenario parameters
    pub scenario_file: Option<PathBuf>,

    /// Output path for the JSON report
    pub output_json: PathBuf,

    /// Directory for CSV export sheets (optional)
    pub export_dir: Option<PathBuf>,

    /// Entity / category / date filters
    pub filter: FilterState,

    // Scenario overrides; `None` keeps the file or config value
    pub reduce_a: Option<f64>,
    pub reduce_peak: Option<f64>,
    pub reduce_frontier: Option<f64>,
    pub investment: Option<f64>,

    /// Explicit header names per role
    pub mapping: MappingOverrides,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            config: None,
            scenario_file: None,
            output_json: PathBuf::from("report.json"),
            export_dir: None,
            filter: FilterState::default(),
            reduce_a: None,
            reduce_peak: None,
            reduce_frontier: None,
            investment: None,
            mapping: MappingOverrides::default(),
            print_summary: false,
        }
    }
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Analyze command arguments
///
/// # Returns
/// The written report document
///
/// # Errors
/// * Config load or validation failures
/// * Input read and column mapping errors
/// * File write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<ReportDocument> {
    let start_time = Instant::now();

    info!("Starting analysis of: {}", args.input.display());

    info!("Step 1/6: Loading configuration...");
    let config = resolve_config(args.config.as_deref())?;

    info!("Step 2/6: Reading input...");
    let overrides = merge_overrides(&args.mapping, &config.mapping);
    let records = load_input(&args.input, &overrides)?;

    info!("Step 3/6: Applying filters...");
    let filtered = apply_filters(&records, &args.filter);
    debug!("{} of {} records after filtering", filtered.len(), records.len());

    info!("Step 4/6: Building scenario...");
    let params = build_scenario(&args, &config)?;
    debug!("Scenario: {:?}", params);

    info!("Step 5/6: Computing metrics...");
    let report = calculate_all_metrics(&filtered, &params, &config.analytics);

    info!("Step 6/6: Writing output files...");
    let document = ReportDocument::new(report);
    write_report(&document, &args.output_json).context("Failed to write report JSON")?;
    info!("✓ Report written to: {}", args.output_json.display());

    if let Some(dir) = &args.export_dir {
        let paths = write_sheets(&export_workbook(&filtered, &document.report), dir)
            .context("Failed to write export sheets")?;
        info!("✓ {} sheets written to: {}", paths.len(), dir.display());
    }

    if args.print_summary {
        println!("{}", render_summary(&document.report));
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(document)
}

/// Scenario parameters from config defaults, then the scenario file, then flags
///
/// The selected date filter doubles as the annualization range.
pub fn build_scenario(args: &AnalyzeArgs, config: &EngineConfig) -> Result<ScenarioParameters> {
    let mut params = match &args.scenario_file {
        Some(path) => read_scenario_file(path, config)?,
        None => ScenarioParameters::from_defaults(&config.scenarios),
    };

    if let Some(v) = args.reduce_a {
        params.reduce_a = v;
    }
    if let Some(v) = args.reduce_peak {
        params.reduce_peak = v;
    }
    if let Some(v) = args.reduce_frontier {
        params.reduce_frontier = v;
    }
    if let Some(v) = args.investment {
        params.investments = v;
    }
    if args.filter.date_range.is_some() {
        params.date_range = args.filter.date_range;
    }

    validate_scenario(&params).context("Invalid scenario parameters")?;
    Ok(params)
}

/// Range checks on merged scenario parameters
///
/// Values from a scenario file skip the flag checks in `validate_args`,
/// so the merged result is checked again here.
pub fn validate_scenario(params: &ScenarioParameters) -> Result<()> {
    for (name, value) in [
        ("reduce_a", params.reduce_a),
        ("reduce_peak", params.reduce_peak),
        ("reduce_frontier", params.reduce_frontier),
    ] {
        if !(0.0..=100.0).contains(&value) {
            anyhow::bail!("{} must be between 0 and 100, got {}", name, value);
        }
    }

    if params.investments < 0.0 || !params.investments.is_finite() {
        anyhow::bail!("investments must be a non-negative amount, got {}", params.investments);
    }

    if let Some((from, to)) = params.date_range {
        if from > to {
            anyhow::bail!("date_range starts ({}) after it ends ({})", from, to);
        }
    }

    Ok(())
}

fn read_scenario_file(path: &Path, config: &EngineConfig) -> Result<ScenarioParameters> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("Scenario file {} is not valid JSON", path.display()))?;

    ScenarioParameters::from_json_with_defaults(&value, &config.scenarios)
        .with_context(|| format!("Invalid scenario parameters in {}", path.display()))
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if !args.input.is_file() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    if args.output_json.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    for (name, value) in [
        ("reduce-a", args.reduce_a),
        ("reduce-peak", args.reduce_peak),
        ("reduce-frontier", args.reduce_frontier),
    ] {
        if let Some(v) = value {
            if !(0.0..=100.0).contains(&v) {
                anyhow::bail!("--{} must be between 0 and 100, got {}", name, v);
            }
        }
    }

    if let Some(v) = args.investment {
        if v < 0.0 || !v.is_finite() {
            anyhow::bail!("--investment must be a non-negative amount, got {}", v);
        }
    }

    if let Some((from, to)) = args.filter.date_range {
        if from > to {
            anyhow::bail!("--from ({}) is after --to ({})", from, to);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    fn input_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "date,store,category,amount").unwrap();
        writeln!(file, "2024-01-01,E1,Cat1,100").unwrap();
        writeln!(file, "2024-01-01,E2,Cat1,900").unwrap();
        file
    }

    #[test]
    fn test_validate_args_valid() {
        let file = input_file();
        let args = AnalyzeArgs {
            input: file.path().to_path_buf(),
            reduce_a: Some(25.0),
            ..Default::default()
        };
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_missing_input() {
        let args = AnalyzeArgs {
            input: PathBuf::from("/definitely/not/here.csv"),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
        assert!(validate_args(&AnalyzeArgs::default()).is_err());
    }

    #[test]
    fn test_validate_args_percent_range() {
        let file = input_file();
        let args = AnalyzeArgs {
            input: file.path().to_path_buf(),
            reduce_peak: Some(150.0),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_negative_investment() {
        let file = input_file();
        let args = AnalyzeArgs {
            input: file.path().to_path_buf(),
            investment: Some(-1.0),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_reversed_dates() {
        let file = input_file();
        let args = AnalyzeArgs {
            input: file.path().to_path_buf(),
            filter: FilterState {
                date_range: Some((
                    NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                )),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_build_scenario_precedence() {
        let mut scenario = tempfile::NamedTempFile::new().unwrap();
        write!(scenario, r#"{{"reduce_top_store": 40, "reduce_a": 12}}"#).unwrap();

        let args = AnalyzeArgs {
            scenario_file: Some(scenario.path().to_path_buf()),
            reduce_a: Some(30.0),
            ..Default::default()
        };
        let params = build_scenario(&args, &EngineConfig::default()).unwrap();

        assert_eq!(params.reduce_a, 30.0);
        assert_eq!(params.reduce_frontier, 40.0);
        assert_eq!(params.reduce_peak, 15.0);
    }

    #[test]
    fn test_build_scenario_rejects_out_of_range_file_values() {
        let mut scenario = tempfile::NamedTempFile::new().unwrap();
        write!(scenario, r#"{{"reduce_a": 500}}"#).unwrap();

        let args = AnalyzeArgs {
            scenario_file: Some(scenario.path().to_path_buf()),
            ..Default::default()
        };
        assert!(build_scenario(&args, &EngineConfig::default()).is_err());

        // a flag bringing the value back into range is accepted
        let args = AnalyzeArgs {
            reduce_a: Some(50.0),
            ..args
        };
        assert_eq!(build_scenario(&args, &EngineConfig::default()).unwrap().reduce_a, 50.0);
    }

    #[test]
    fn test_validate_scenario_file_date_range() {
        let params = ScenarioParameters::default().with_date_range(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        );
        assert!(validate_scenario(&params).is_err());
        assert!(validate_scenario(&ScenarioParameters::default()).is_ok());
    }

    #[test]
    fn test_execute_analyze_writes_outputs() {
        let file = input_file();
        let dir = tempfile::tempdir().unwrap();
        let args = AnalyzeArgs {
            input: file.path().to_path_buf(),
            output_json: dir.path().join("report.json"),
            export_dir: Some(dir.path().join("sheets")),
            ..Default::default()
        };

        let document = execute_analyze(args).unwrap();
        assert_eq!(document.report.total_value, 1000.0);
        assert!(dir.path().join("report.json").exists());
        assert!(dir.path().join("sheets/what_if.csv").exists());
        assert!(dir.path().join("sheets/by_entity.csv").exists());
        assert!(dir.path().join("sheets/records.csv").exists());
    }
}
