//! Output writers for metrics reports.
//!
//! This module handles writing data to disk and to the terminal:
//! - JSON report documents
//! - CSV export sheets
//! - Text summaries

pub mod json;
pub mod sheets;
pub mod summary;

// Re-export main functions
pub use json::{read_report, report_to_string, write_report, ReportDocument};
pub use sheets::write_sheets;
pub use summary::render_summary;
