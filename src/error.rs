use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Source file not found: {}", .0.display())]
    MissingSourceFile(PathBuf),

    #[error("Column '{column}' is missing from sheet '{sheet}'")]
    MissingColumn { sheet: String, column: String },

    #[error("Sheet '{sheet}' not found in {}", .path.display())]
    SheetNotFound { sheet: String, path: PathBuf },

    #[error("Coordinate conversion failed: {0}")]
    GeodeticConversion(String),

    #[error("No variable sheet could be loaded from {}", .0.display())]
    NoVariablesLoaded(PathBuf),

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Unknown data source: {0}")]
    UnknownSource(String),

    #[error("No records in scope {0}")]
    EmptyScope(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl From<config::ConfigError> for ProcessingError {
    fn from(err: config::ConfigError) -> Self {
        ProcessingError::Config(err.to_string())
    }
}
