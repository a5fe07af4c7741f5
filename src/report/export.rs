//! Tabular export of a report.
//!
//! Sheets are plain string tables so any writer (CSV, spreadsheet) can
//! consume them. The engine does not pick a file format.

use super::schema::MetricsReport;
use crate::aggregator::GroupedAggregate;
use crate::records::{Column, Record, RecordSet};
use serde::{Deserialize, Serialize};

/// A named table with a header row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    fn new(name: &str, headers: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

/// The analyzed records followed by the report sheets
///
/// `records` should be the set the report was computed from, after filters.
pub fn export_workbook(records: &RecordSet, report: &MetricsReport) -> Vec<Sheet> {
    let mut sheets = vec![records_sheet(records)];
    sheets.extend(export_sheets(report));
    sheets
}

/// The normalized records, one row each, declared columns in schema order
pub fn records_sheet(records: &RecordSet) -> Sheet {
    let declared = records.columns();
    let columns: Vec<Column> = Column::ALL
        .into_iter()
        .filter(|c| declared.contains(*c))
        .collect();

    let headers: Vec<&str> = columns.iter().map(|c| c.as_str()).collect();
    let mut sheet = Sheet::new("records", &headers);
    for record in records {
        sheet.push(columns.iter().map(|c| cell(record, *c)).collect());
    }
    sheet
}

fn cell(record: &Record, column: Column) -> String {
    match column {
        Column::Value => record.value.to_string(),
        _ => record.key(column).unwrap_or_default(),
    }
}

/// One sheet per non-empty aggregate plus the what-if table
///
/// Order: `by_category`, `by_entity`, `abc`, `pareto`, `what_if`. The
/// what-if sheet is always present and ends with a `total` row.
pub fn export_sheets(report: &MetricsReport) -> Vec<Sheet> {
    let mut sheets = Vec::new();

    if let Some(sheet) = grouped_sheet("by_category", &report.category_aggregate) {
        sheets.push(sheet);
    }
    if let Some(sheet) = grouped_sheet("by_entity", &report.entity_aggregate) {
        sheets.push(sheet);
    }

    if !report.abc.is_empty() {
        let key = report.abc.group_by.map_or("group", |c| c.as_str());
        let mut sheet = Sheet::new(
            "abc",
            &[key, "value", "percentage", "cumulative_percentage", "abc_class"],
        );
        for row in &report.abc.rows {
            sheet.push(vec![
                row.key.clone(),
                row.value.to_string(),
                row.percentage.to_string(),
                row.cumulative_percentage.to_string(),
                row.abc_class.to_string(),
            ]);
        }
        sheets.push(sheet);
    }

    if !report.pareto.is_empty() {
        let key = report.pareto.group_by.unwrap_or(Column::Entity).as_str();
        let mut sheet = Sheet::new(
            "pareto",
            &[key, "value", "percentage", "cumulative_percentage", "is_frontier"],
        );
        for row in &report.pareto.rows {
            sheet.push(vec![
                row.key.clone(),
                row.value.to_string(),
                row.percentage.to_string(),
                row.cumulative_percentage.to_string(),
                row.is_frontier.to_string(),
            ]);
        }
        sheets.push(sheet);
    }

    sheets.push(what_if_sheet(report));
    sheets
}

fn grouped_sheet(name: &str, aggregate: &GroupedAggregate) -> Option<Sheet> {
    if aggregate.is_empty() {
        return None;
    }

    let key = aggregate.group_by.map_or("group", |c| c.as_str());
    let mut sheet = Sheet::new(name, &[key, "value", "percentage"]);
    for row in &aggregate.rows {
        sheet.push(vec![
            row.key.clone(),
            row.value.to_string(),
            row.percentage.to_string(),
        ]);
    }
    Some(sheet)
}

fn what_if_sheet(report: &MetricsReport) -> Sheet {
    let params = &report.scenarios;
    let savings = &report.savings;

    let mut sheet = Sheet::new("what_if", &["scenario", "reduction_pct", "savings"]);
    for (scenario, pct, amount) in [
        ("a_class", params.reduce_a, savings.a),
        ("peak_periods", params.reduce_peak, savings.peak),
        ("frontier", params.reduce_frontier, savings.frontier),
    ] {
        sheet.push(vec![scenario.to_string(), pct.to_string(), amount.to_string()]);
    }
    sheet.push(vec!["total".to_string(), "-".to_string(), savings.total.to_string()]);
    sheet
}
