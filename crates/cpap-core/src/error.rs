//! Error types for cpap-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The caller handed over something that is not a sequence of session records
    #[error("Invalid input kind: {0}")]
    InputKind(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
