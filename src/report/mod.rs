//! Metrics report: schema, assembly, recommendations and export tables.

pub mod assembler;
pub mod export;
pub mod recommendations;
pub mod schema;

pub use assembler::{calculate_all_metrics, calculate_default_metrics};
pub use export::{export_sheets, export_workbook, records_sheet, Sheet};
pub use recommendations::{recommendations, Recommendation, RecommendationKind, MAX_RECOMMENDATIONS};
pub use schema::MetricsReport;
