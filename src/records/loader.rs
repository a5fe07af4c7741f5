//! CSV record loader.
//!
//! Reads a headed CSV table and normalizes it through a `ColumnMapping`:
//! - `value` coerces to 0 when empty or non-numeric
//! - rows whose `date` cannot be parsed are dropped
//! - empty `entity` / `category` cells become `None`

use super::mapping::ColumnMapping;
use super::schema::{Columns, Record, RecordSet};
use crate::utils::error::LoadError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use log::{debug, info, warn};
use std::io::Read;
use std::path::Path;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Read only the header row (for auto-detection)
pub fn headers_of<R: Read>(reader: R) -> Result<Vec<String>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    Ok(csv_reader.headers()?.iter().map(|h| h.to_string()).collect())
}

/// Read the header row of a CSV file
pub fn headers_of_file(path: impl AsRef<Path>) -> Result<Vec<String>, LoadError> {
    let file = std::fs::File::open(path)?;
    headers_of(file)
}

/// Load a normalized record set from a CSV reader
///
/// # Errors
/// * `LoadError::MissingMapping` - date or value role not mapped
/// * `LoadError::UnknownColumn` - a mapped header is not in the file
/// * `LoadError::Csv` - malformed CSV
pub fn load_records<R: Read>(reader: R, mapping: &ColumnMapping) -> Result<RecordSet, LoadError> {
    mapping.validate()?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let date_idx = required_index(&headers, mapping.date.as_deref())?;
    let value_idx = required_index(&headers, mapping.value.as_deref())?;
    let entity_idx = optional_index(&headers, mapping.entity.as_deref())?;
    let category_idx = optional_index(&headers, mapping.category.as_deref())?;

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for (line_num, row) in csv_reader.records().enumerate() {
        let row = row?;

        let Some(date) = row.get(date_idx).and_then(parse_date) else {
            debug!("Dropping row at line {}: unparseable date", line_num + 2);
            dropped += 1;
            continue;
        };

        let value = row.get(value_idx).map(parse_value).unwrap_or(0.0);

        records.push(Record {
            date: Some(date),
            value,
            entity: entity_idx.and_then(|i| non_empty(&row, i)),
            category: category_idx.and_then(|i| non_empty(&row, i)),
        });
    }

    if dropped > 0 {
        warn!("Dropped {} rows with missing or invalid dates", dropped);
    }
    info!("Loaded {} records", records.len());

    let columns = Columns {
        date: true,
        value: true,
        entity: entity_idx.is_some(),
        category: category_idx.is_some(),
    };

    Ok(RecordSet::with_columns(records, columns))
}

/// Load a normalized record set from a CSV file path
pub fn load_records_file(
    path: impl AsRef<Path>,
    mapping: &ColumnMapping,
) -> Result<RecordSet, LoadError> {
    let path = path.as_ref();
    debug!("Reading records from: {}", path.display());

    let file = std::fs::File::open(path)?;
    load_records(file, mapping)
}

/// Parse a calendar date, accepting a few common layouts
///
/// Timestamps are truncated to their day.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Parse a numeric cell; anything unparseable counts as zero
pub fn parse_value(raw: &str) -> f64 {
    let cleaned: String = raw.trim().chars().filter(|c| !c.is_whitespace()).collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            if !cleaned.is_empty() {
                debug!("Non-numeric value '{}' coerced to 0", raw);
            }
            0.0
        }
    }
}

fn required_index(headers: &StringRecord, name: Option<&str>) -> Result<usize, LoadError> {
    let name = name.unwrap_or_default();
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| LoadError::UnknownColumn {
            column: name.to_string(),
        })
}

fn optional_index(headers: &StringRecord, name: Option<&str>) -> Result<Option<usize>, LoadError> {
    name.map(|n| required_index(headers, Some(n))).transpose()
}

fn non_empty(row: &StringRecord, idx: usize) -> Option<String> {
    row.get(idx)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}
