//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! The metrics engine itself has no error type: missing columns, empty input
//! and zero denominators degrade to empty/zero results instead.

use thiserror::Error;

/// Errors that can occur while turning a raw table into a record set
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Column mapping is missing required role: {0}")]
    MissingMapping(&'static str),

    #[error("Mapped column '{column}' not found in input headers")]
    UnknownColumn { column: String },
}

/// Errors that can occur while loading or validating engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Invalid ABC thresholds: a_threshold ({a}) must be less than b_threshold ({b})")]
    InvalidThreshold { a: f64, b: f64 },

    #[error("Value out of range for {field}: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Failed to write CSV sheet: {0}")]
    SheetFailed(#[from] csv::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
