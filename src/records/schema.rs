//! Normalized record set definitions.
//!
//! Every input table is reduced to four roles: `date`, `value`, `entity`
//! and `category`. The engine only ever reads this shape.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single normalized record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Calendar day the value belongs to
    pub date: Option<NaiveDate>,

    /// The measure being summed (loss, sales, cost)
    pub value: f64,

    /// Grouping level 1 (store / region / client)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,

    /// Grouping level 2 (product category / type)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Record {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self {
            date: Some(date),
            value,
            entity: None,
            category: None,
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Grouping key of this record for `column`, if the record has one
    pub fn key(&self, column: Column) -> Option<String> {
        match column {
            Column::Date => self.date.map(|d| d.format("%Y-%m-%d").to_string()),
            Column::Value => None,
            Column::Entity => self.entity.clone(),
            Column::Category => self.category.clone(),
        }
    }
}

/// The four column roles of the normalized schema, in schema order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Date,
    Value,
    Entity,
    Category,
}

impl Column {
    pub const ALL: [Column; 4] = [Column::Date, Column::Value, Column::Entity, Column::Category];

    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Date => "date",
            Column::Value => "value",
            Column::Entity => "entity",
            Column::Category => "category",
        }
    }

    /// Whether records can be grouped by this column
    pub fn is_groupable(&self) -> bool {
        !matches!(self, Column::Value)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(Column::Date),
            "value" => Ok(Column::Value),
            "entity" => Ok(Column::Entity),
            "category" => Ok(Column::Category),
            other => Err(format!("unknown column role: {}", other)),
        }
    }
}

/// Which column roles the source table provided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Columns {
    pub date: bool,
    pub value: bool,
    pub entity: bool,
    pub category: bool,
}

impl Columns {
    pub fn all() -> Self {
        Self {
            date: true,
            value: true,
            entity: true,
            category: true,
        }
    }

    pub fn contains(&self, column: Column) -> bool {
        match column {
            Column::Date => self.date,
            Column::Value => self.value,
            Column::Entity => self.entity,
            Column::Category => self.category,
        }
    }
}

/// Ordered, immutable collection of normalized records
///
/// Produced once per load/filter; the engine never mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    records: Vec<Record>,
    columns: Columns,
}

impl RecordSet {
    /// Build a record set, inferring optional columns from the data
    pub fn new(records: Vec<Record>) -> Self {
        let columns = Columns {
            date: records.iter().any(|r| r.date.is_some()),
            value: true,
            entity: records.iter().any(|r| r.entity.is_some()),
            category: records.iter().any(|r| r.category.is_some()),
        };
        Self { records, columns }
    }

    /// Build a record set with an explicit column declaration
    pub fn with_columns(records: Vec<Record>, columns: Columns) -> Self {
        Self { records, columns }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn columns(&self) -> Columns {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Whether `column` is declared and at least one record carries it
    pub fn has_column(&self, column: Column) -> bool {
        if !self.columns.contains(column) {
            return false;
        }
        match column {
            Column::Value => true,
            _ => self.records.iter().any(|r| r.key(column).is_some()),
        }
    }

    /// Earliest and latest record date
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.records.iter().filter_map(|r| r.date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    /// Sum of `value` over all records
    pub fn total_value(&self) -> f64 {
        if !self.columns.value {
            return 0.0;
        }
        self.records.iter().map(|r| r.value).sum()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<Record> for RecordSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
