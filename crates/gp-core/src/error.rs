//! Errors shared by every plotting crate

use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use thiserror::Error;

/// Errors that can occur while preparing a plot
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Column '{column}' not found. Available: {available:?}")]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    #[error("Column '{column}' has unsupported type {data_type:?}")]
    UnsupportedColumnType {
        column: String,
        data_type: DataType,
    },

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("Numerical error: {0}")]
    Numerical(String),
}

impl PlotError {
    /// Shorthand for an `InvalidArgument` error
    pub fn invalid(message: impl Into<String>) -> Self {
        PlotError::InvalidArgument(message.into())
    }

    /// Whether this error was caused by the caller's arguments
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            PlotError::InvalidArgument(_)
                | PlotError::ColumnNotFound { .. }
                | PlotError::UnsupportedColumnType { .. }
        )
    }
}

pub type PlotResult<T> = Result<T, PlotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_classification() {
        assert!(PlotError::invalid("bins must be positive").is_invalid_argument());
        assert!(PlotError::ColumnNotFound {
            column: "x".to_string(),
            available: vec!["y".to_string()],
        }
        .is_invalid_argument());
        assert!(!PlotError::Numerical("singular".to_string()).is_invalid_argument());
    }

    #[test]
    fn test_error_messages() {
        let err = PlotError::ColumnNotFound {
            column: "petal_length".to_string(),
            available: vec!["species".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Column 'petal_length' not found. Available: [\"species\"]"
        );
    }
}
