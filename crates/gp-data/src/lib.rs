//! Table loading for the plotting recipes
//!
//! Recipes consume Arrow record batches; this crate produces them from
//! delimited text files with type inference and configurable null handling.

pub mod config;
pub mod schema;
pub mod sources;

use arrow::error::ArrowError;
use thiserror::Error;

// Re-exports
pub use config::{FileConfig, NullConfig, SerializableDataType};
pub use schema::SchemaDetector;
pub use sources::CsvLoader;

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Schema detection error: {0}")]
    SchemaDetection(String),

    #[error("Selected column '{0}' not found in file")]
    UnknownColumn(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}
