//! Column type inference from sampled rows

use arrow::datatypes::{DataType, Field, Schema};

use crate::config::NullConfig;

/// Schema detector for analyzing data and determining column types
pub struct SchemaDetector {
    null_config: NullConfig,
}

impl SchemaDetector {
    /// Create a new schema detector
    pub fn new(null_config: NullConfig) -> Self {
        Self { null_config }
    }

    /// Detect a schema from header names and sampled rows.
    ///
    /// All fields are nullable since rows past the sample may hold nulls.
    pub fn detect_from_samples(&self, headers: &[String], samples: &[Vec<String>]) -> Schema {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(col_idx, header)| Field::new(header, self.detect_column_type(samples, col_idx), true))
            .collect::<Vec<_>>();

        Schema::new(fields)
    }

    /// Detect the type of one column.
    ///
    /// Booleans win over integers, integers over floats, everything else is
    /// a string. A column with no non-null sample is a string.
    pub fn detect_column_type(&self, samples: &[Vec<String>], col_idx: usize) -> DataType {
        let mut seen = false;
        let mut is_bool = true;
        let mut is_int = true;
        let mut is_float = true;

        for value in samples.iter().filter_map(|row| row.get(col_idx)) {
            if self.null_config.is_null(value) {
                continue;
            }
            seen = true;
            let value = value.trim();

            if is_bool && parse_bool(value).is_none() {
                is_bool = false;
            }
            if is_int && value.parse::<i64>().is_err() {
                is_int = false;
            }
            if is_float && value.parse::<f64>().is_err() {
                is_float = false;
            }
        }

        if !seen {
            DataType::Utf8
        } else if is_bool {
            DataType::Boolean
        } else if is_int {
            DataType::Int64
        } else if is_float {
            DataType::Float64
        } else {
            DataType::Utf8
        }
    }
}

impl Default for SchemaDetector {
    fn default() -> Self {
        Self::new(NullConfig::default())
    }
}

/// Parse the textual boolean spellings accepted by the loader
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => None,
    }
}
