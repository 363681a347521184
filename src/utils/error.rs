use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeadError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error(
        "could not decode {} into a table with any encoding (tried: {})",
        .path.display(),
        .encodings.join(", ")
    )]
    EncodingDetection {
        path: PathBuf,
        encodings: Vec<String>,
    },

    #[error("failed to process file {}: {message}", .path.display())]
    FileProcessing { path: PathBuf, message: String },

    #[error("input file list is empty")]
    EmptyBatch,

    #[error("configuration error: {message}")]
    ConfigError { message: String },

    #[error("invalid value for {field}: {value} ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, LeadError>;
