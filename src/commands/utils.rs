//! Helpers shared by commands, plus the small informational commands.

use crate::output::read_report;
use crate::records::{headers_of_file, load_records_file, ColumnMapping, RecordSet};
use crate::utils::config::{load_config, EngineConfig, MappingOverrides, SCHEMA_VERSION};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Load the config file if one was given, defaults otherwise
pub fn resolve_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            info!("Using config: {}", path.display());
            load_config(path).with_context(|| format!("Failed to load config {}", path.display()))
        }
        None => {
            debug!("No config file, using defaults");
            Ok(EngineConfig::default())
        }
    }
}

/// CLI overrides win over config overrides, per role
pub fn merge_overrides(cli: &MappingOverrides, config: &MappingOverrides) -> MappingOverrides {
    MappingOverrides {
        date: cli.date.clone().or_else(|| config.date.clone()),
        value: cli.value.clone().or_else(|| config.value.clone()),
        entity: cli.entity.clone().or_else(|| config.entity.clone()),
        category: cli.category.clone().or_else(|| config.category.clone()),
    }
}

/// Detect the column mapping of a CSV file and load its records
pub fn load_input(path: &Path, overrides: &MappingOverrides) -> Result<RecordSet> {
    let headers = headers_of_file(path)
        .with_context(|| format!("Failed to read headers of {}", path.display()))?;
    debug!("Input headers: {:?}", headers);

    let mapping = ColumnMapping::auto_detect(&headers).with_overrides(overrides);
    mapping
        .validate()
        .with_context(|| format!("Cannot map columns of {} (headers: {})", path.display(), headers.join(", ")))?;

    info!(
        "Column mapping: date={:?} value={:?} entity={:?} category={:?}",
        mapping.date, mapping.value, mapping.entity, mapping.category
    );

    load_records_file(path, &mapping)
        .with_context(|| format!("Failed to load records from {}", path.display()))
}

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let document = read_report(&file_path)?;
    let report = &document.report;

    if document.version != SCHEMA_VERSION {
        println!(
            "! Schema version {} differs from current {}",
            document.version, SCHEMA_VERSION
        );
    }

    println!("✓ Valid report JSON");
    println!("  Version: {}", document.version);
    println!("  Generated: {}", document.generated_at);
    println!("  Records: {}", report.record_count);
    println!("  Total Value: {:.2}", report.total_value);
    println!("  Categories: {}", report.category_aggregate.len());
    println!("  Entities: {}", report.entity_aggregate.len());
    println!("  Total Savings: {}", report.savings.total);

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Loss Sentinel Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string             - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string        - RFC 3339 timestamp");
        println!("  report: object");
        println!("    record_count: number      - Records after filtering");
        println!("    total_value: number       - Sum of value");
        println!("    category_aggregate: object - Rows of key / value / percentage");
        println!("    entity_aggregate: object  - Rows of key / value / percentage");
        println!("    abc: object               - Rows with cumulative_percentage and abc_class");
        println!("    pareto: object            - Rows with cumulative_percentage and is_frontier");
        println!("    a_class_value: number     - Sum over A-class groups");
        println!("    peak_value: number        - Sum over peak dates");
        println!("    frontier_value: number    - Sum over frontier entities");
        println!("    scenarios: object         - Scenario parameters used");
        println!("    savings: object           - a / peak / frontier / total / annual");
        println!("    roi: number               - Percent, 1 decimal");
        println!("    period_days: number       - Days used for annualization");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Loss Sentinel v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Loss and sales analytics: ABC/Pareto classification, peak periods and what-if savings.");
}
