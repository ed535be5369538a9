//! Error types for SubScout

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A date or amount could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// A row or batch failed validation (empty merchant, row cap exceeded)
    #[error("Validation error: {0}")]
    Validation(String),

    /// No parseable rows were left to analyze
    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;
