//! Column role mapping.
//!
//! Maps raw table headers onto the four normalized roles. Detection is a
//! lookup against the pattern lists in `utils::config`; the lists are data,
//! the matching rule is fixed.

use super::schema::Column;
use crate::utils::config::{
    MappingOverrides, CATEGORY_PATTERNS, DATE_PATTERNS, ENTITY_PATTERNS, VALUE_PATTERNS,
};
use crate::utils::error::LoadError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Header name assigned to each role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub date: Option<String>,
    pub value: Option<String>,
    pub entity: Option<String>,
    pub category: Option<String>,
}

impl ColumnMapping {
    /// Propose a role assignment for `headers`
    ///
    /// Headers are compared trimmed and lowercased. For each role the
    /// first pattern that matches a header wins; a header already assigned
    /// to an earlier role is skipped.
    pub fn auto_detect<S: AsRef<str>>(headers: &[S]) -> Self {
        let lower: HashMap<String, &str> = headers
            .iter()
            .map(|h| (h.as_ref().trim().to_lowercase(), h.as_ref()))
            .collect();

        let mut taken: Vec<String> = Vec::new();
        let mut detect = |patterns: &[&str]| -> Option<String> {
            let found = patterns
                .iter()
                .filter_map(|p| lower.get(*p))
                .find(|h| !taken.iter().any(|t| t == *h))
                .map(|h| h.to_string());
            if let Some(h) = &found {
                taken.push(h.clone());
            }
            found
        };

        let mapping = Self {
            date: detect(DATE_PATTERNS),
            value: detect(VALUE_PATTERNS),
            entity: detect(ENTITY_PATTERNS),
            category: detect(CATEGORY_PATTERNS),
        };

        debug!("Auto-detected column mapping: {:?}", mapping);
        mapping
    }

    /// Replace detected roles with explicitly configured header names
    pub fn with_overrides(mut self, overrides: &MappingOverrides) -> Self {
        if let Some(h) = &overrides.date {
            self.date = Some(h.clone());
        }
        if let Some(h) = &overrides.value {
            self.value = Some(h.clone());
        }
        if let Some(h) = &overrides.entity {
            self.entity = Some(h.clone());
        }
        if let Some(h) = &overrides.category {
            self.category = Some(h.clone());
        }
        self
    }

    pub fn get(&self, column: Column) -> Option<&str> {
        match column {
            Column::Date => self.date.as_deref(),
            Column::Value => self.value.as_deref(),
            Column::Entity => self.entity.as_deref(),
            Column::Category => self.category.as_deref(),
        }
    }

    /// Date and value are required; entity and category are optional
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.date.is_none() {
            return Err(LoadError::MissingMapping("date"));
        }
        if self.value.is_none() {
            return Err(LoadError::MissingMapping("value"));
        }
        Ok(())
    }
}
