use std::fs::File;
use std::io::{BufReader, Read};
use std::sync::Arc;
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use csv::ReaderBuilder;

use crate::config::FileConfig;
use crate::schema::{parse_bool, SchemaDetector};
use crate::DataError;

/// Loads a delimited text file into a single record batch
pub struct CsvLoader {
    config: FileConfig,
}

impl CsvLoader {
    /// Create a loader for the given file configuration
    pub fn new(config: FileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FileConfig {
        &self.config
    }

    /// Load the configured file
    pub fn load(&self) -> Result<RecordBatch, DataError> {
        tracing::info!("Loading CSV file: {:?}", self.config.path);
        let file = File::open(&self.config.path)?;
        self.load_from_reader(BufReader::new(file))
    }

    /// Load from any reader using the configured delimiter, nulls and types
    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<RecordBatch, DataError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.config.delimiter)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(|s| s.to_string()).collect();

        for selected in &self.config.selected_columns {
            if !headers.contains(selected) {
                return Err(DataError::UnknownColumn(selected.clone()));
            }
        }

        let mut row_data: Vec<Vec<String>> = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            row_data.push(record.iter().map(|s| s.to_string()).collect());
        }

        let sample_end = self.config.sample_size.min(row_data.len());
        let detected = SchemaDetector::new(self.config.null_config.clone())
            .detect_from_samples(&headers, &row_data[..sample_end]);

        // Projection keeps file order
        let selected: Vec<(usize, Field)> = detected
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, field)| self.config.is_selected(field.name()))
            .map(|(idx, field)| {
                let data_type = self.config.get_column_type(field.name(), field.data_type());
                (idx, Field::new(field.name(), data_type, true))
            })
            .collect();

        if selected.is_empty() {
            return Err(DataError::SchemaDetection("file has no columns to load".to_string()));
        }

        let columns = selected
            .iter()
            .map(|(col_idx, field)| self.build_column(&row_data, *col_idx, field))
            .collect::<Vec<ArrayRef>>();

        let schema = Schema::new(selected.into_iter().map(|(_, f)| f).collect::<Vec<_>>());
        let batch = RecordBatch::try_new(Arc::new(schema), columns)?;
        tracing::info!(
            "Loaded {} rows and {} columns from {}",
            batch.num_rows(),
            batch.num_columns(),
            self.config.file_name()
        );
        Ok(batch)
    }

    /// Build one Arrow array; unparseable cells become nulls
    fn build_column(&self, row_data: &[Vec<String>], col_idx: usize, field: &Field) -> ArrayRef {
        let cells = row_data.iter().map(|row| {
            row.get(col_idx)
                .filter(|value| !self.config.is_null_value(value))
                .map(|value| value.trim())
        });

        let mut rejected = 0usize;
        let array: ArrayRef = match field.data_type() {
            DataType::Int64 => {
                let mut builder = Int64Builder::new();
                for cell in cells {
                    match cell.map(|v| v.parse::<i64>()) {
                        Some(Ok(v)) => builder.append_value(v),
                        Some(Err(_)) => {
                            rejected += 1;
                            builder.append_null();
                        }
                        None => builder.append_null(),
                    }
                }
                Arc::new(builder.finish())
            }
            DataType::Float64 => {
                let mut builder = Float64Builder::new();
                for cell in cells {
                    match cell.map(|v| v.parse::<f64>()) {
                        Some(Ok(v)) => builder.append_value(v),
                        Some(Err(_)) => {
                            rejected += 1;
                            builder.append_null();
                        }
                        None => builder.append_null(),
                    }
                }
                Arc::new(builder.finish())
            }
            DataType::Boolean => {
                let mut builder = BooleanBuilder::new();
                for cell in cells {
                    match cell.map(parse_bool) {
                        Some(Some(v)) => builder.append_value(v),
                        Some(None) => {
                            rejected += 1;
                            builder.append_null();
                        }
                        None => builder.append_null(),
                    }
                }
                Arc::new(builder.finish())
            }
            _ => {
                let mut builder = StringBuilder::new();
                for cell in cells {
                    match cell {
                        Some(v) => builder.append_value(v),
                        None => builder.append_null(),
                    }
                }
                Arc::new(builder.finish())
            }
        };

        if rejected > 0 {
            tracing::warn!(
                "Column '{}': {} values could not be parsed as {:?} and were loaded as null",
                field.name(),
                rejected,
                field.data_type()
            );
        }
        array
    }
}
