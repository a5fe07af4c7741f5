//! Normalized record set and the collaborators that produce it.
//!
//! This module handles:
//! - The four-role record shape consumed by the engine
//! - Column role detection from raw headers
//! - CSV loading and value/date coercion
//! - Entity / category / date filtering

pub mod filters;
pub mod loader;
pub mod mapping;
pub mod schema;

// Re-export main types
pub use filters::{apply_filters, FilterState};
pub use loader::{headers_of, headers_of_file, load_records, load_records_file, parse_date};
pub use mapping::ColumnMapping;
pub use schema::{Column, Columns, Record, RecordSet};
