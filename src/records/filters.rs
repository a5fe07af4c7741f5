//! Entity / category / date-range filtering.
//!
//! Filtering always produces a new record set; the input is left alone.

use super::schema::{Record, RecordSet};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

/// User-selected filters; empty selections mean "keep everything"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub entities: Vec<String>,

    #[serde(default)]
    pub categories: Vec<String>,

    /// Inclusive date range
    #[serde(default)]
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.categories.is_empty() && self.date_range.is_none()
    }

    fn keeps(&self, record: &Record) -> bool {
        if !self.entities.is_empty() && !contains(&self.entities, record.entity.as_deref()) {
            return false;
        }

        if !self.categories.is_empty() && !contains(&self.categories, record.category.as_deref()) {
            return false;
        }

        if let Some((start, end)) = self.date_range {
            match record.date {
                Some(d) if d >= start && d <= end => {}
                _ => return false,
            }
        }

        true
    }
}

fn contains(selection: &[String], value: Option<&str>) -> bool {
    value.is_some_and(|v| selection.iter().any(|s| s == v))
}

/// Apply `filter` to `records`, returning a new record set
///
/// Column declarations carry over unchanged, so a filter that removes
/// every entity value does not turn the entity column into a new shape.
pub fn apply_filters(records: &RecordSet, filter: &FilterState) -> RecordSet {
    if filter.is_empty() {
        return records.clone();
    }

    let kept: Vec<Record> = records
        .iter()
        .filter(|r| filter.keeps(r))
        .cloned()
        .collect();

    debug!("Filters kept {} of {} records", kept.len(), records.len());

    RecordSet::with_columns(kept, records.columns())
}
