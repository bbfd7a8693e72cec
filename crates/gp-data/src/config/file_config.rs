//! File configuration for data loading

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use serde::{Serialize, Deserialize};
use arrow::datatypes::DataType;

use super::null_handling::NullConfig;
use crate::DataError;

/// Data type override that can be serialized
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SerializableDataType {
    Boolean,
    Int64,
    Float64,
    Utf8,
}

impl From<SerializableDataType> for DataType {
    fn from(sdt: SerializableDataType) -> Self {
        match sdt {
            SerializableDataType::Boolean => DataType::Boolean,
            SerializableDataType::Int64 => DataType::Int64,
            SerializableDataType::Float64 => DataType::Float64,
            SerializableDataType::Utf8 => DataType::Utf8,
        }
    }
}

/// Configuration for loading a single delimited file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Path to the file
    pub path: PathBuf,

    /// Field delimiter
    pub delimiter: u8,

    /// Columns to keep; empty keeps all of them
    pub selected_columns: HashSet<String>,

    /// Column type overrides
    pub column_types: HashMap<String, SerializableDataType>,

    /// Null handling configuration
    pub null_config: NullConfig,

    /// Number of rows sampled for type inference
    pub sample_size: usize,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            delimiter: b',',
            selected_columns: HashSet::new(),
            column_types: HashMap::new(),
            null_config: NullConfig::default(),
            sample_size: 1000,
        }
    }
}

impl FileConfig {
    /// Create a new file configuration
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON
    pub fn from_json_str(text: &str) -> Result<Self, DataError> {
        serde_json::from_str(text).map_err(|e| DataError::Config(e.to_string()))
    }

    /// Get the file name
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string()
    }

    /// Restrict loading to the given columns
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Force a column to a given type
    pub fn with_column_type(mut self, column: impl Into<String>, data_type: SerializableDataType) -> Self {
        self.column_types.insert(column.into(), data_type);
        self
    }

    /// Whether a column should be loaded
    pub fn is_selected(&self, column: &str) -> bool {
        self.selected_columns.is_empty() || self.selected_columns.contains(column)
    }

    /// Get column type with override
    pub fn get_column_type(&self, column: &str, detected_type: &DataType) -> DataType {
        self.column_types
            .get(column)
            .copied()
            .map(|sdt| sdt.into())
            .unwrap_or_else(|| detected_type.clone())
    }

    /// Check if a value should be treated as null
    pub fn is_null_value(&self, value: &str) -> bool {
        self.null_config.is_null(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_type_override() {
        let config = FileConfig::new("mpg.csv")
            .with_column_type("model_year", SerializableDataType::Utf8);

        assert_eq!(config.get_column_type("model_year", &DataType::Int64), DataType::Utf8);
        assert_eq!(config.get_column_type("mpg", &DataType::Float64), DataType::Float64);
        assert_eq!(config.file_name(), "mpg.csv");
    }

    #[test]
    fn test_selection() {
        let config = FileConfig::default();
        assert!(config.is_selected("anything"));

        let config = config.with_columns(["x", "y"]);
        assert!(config.is_selected("x"));
        assert!(!config.is_selected("species"));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = FileConfig::from_json_str(
            r#"{"path": "iris.csv", "column_types": {"species": "Utf8"}}"#,
        ).unwrap();

        assert_eq!(config.path, PathBuf::from("iris.csv"));
        assert_eq!(config.delimiter, b',');
        assert_eq!(config.sample_size, 1000);
        assert_eq!(config.column_types.get("species"), Some(&SerializableDataType::Utf8));

        assert!(matches!(
            FileConfig::from_json_str("{\"sample_size\": \"many\"}"),
            Err(DataError::Config(_))
        ));
    }
}
