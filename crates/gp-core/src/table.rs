//! Column access helpers for Arrow record batches
//!
//! Recipes address their input by column name. These helpers resolve the
//! name, check the type and hand back plain Rust values. Batches are never
//! modified in place: every transformation returns a new batch sharing the
//! untouched arrays.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, StringArray, UInt64Array};
use arrow::compute::{cast, take};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use crate::error::{PlotError, PlotResult};

/// Names of all columns in schema order
pub fn column_names(batch: &RecordBatch) -> Vec<String> {
    batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect()
}

fn column<'a>(batch: &'a RecordBatch, name: &str) -> PlotResult<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| PlotError::ColumnNotFound {
            column: name.to_string(),
            available: column_names(batch),
        })
}

/// Extract a numeric column as `f64`, keeping nulls as `None`.
///
/// Any integer or floating point column is accepted.
pub fn numeric_values(batch: &RecordBatch, name: &str) -> PlotResult<Vec<Option<f64>>> {
    let array = column(batch, name)?;
    if !array.data_type().is_numeric() {
        return Err(PlotError::UnsupportedColumnType {
            column: name.to_string(),
            data_type: array.data_type().clone(),
        });
    }
    tracing::debug!("Found numeric column '{}' with type {:?}", name, array.data_type());

    let converted = cast(array.as_ref(), &DataType::Float64)?;
    let floats = converted
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| PlotError::UnsupportedColumnType {
            column: name.to_string(),
            data_type: array.data_type().clone(),
        })?;

    Ok((0..floats.len())
        .map(|i| if floats.is_null(i) { None } else { Some(floats.value(i)) })
        .collect())
}

/// Extract a numeric column that must not contain nulls
pub fn dense_numeric_values(batch: &RecordBatch, name: &str) -> PlotResult<Vec<f64>> {
    numeric_values(batch, name)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| {
                PlotError::invalid(format!("column '{}' has a null value at row {}", name, row))
            })
        })
        .collect()
}

/// Extract a column as display strings, keeping nulls as `None`.
///
/// String columns are read directly; other types use Arrow's display
/// formatting so integer categories such as years work too.
pub fn category_values(batch: &RecordBatch, name: &str) -> PlotResult<Vec<Option<String>>> {
    let array = column(batch, name)?;

    if let Some(str_array) = array.as_any().downcast_ref::<StringArray>() {
        return Ok((0..str_array.len())
            .map(|i| {
                if str_array.is_null(i) {
                    None
                } else {
                    Some(str_array.value(i).to_string())
                }
            })
            .collect());
    }

    (0..array.len())
        .map(|i| {
            if array.is_null(i) {
                Ok(None)
            } else {
                arrow::util::display::array_value_to_string(array, i)
                    .map(Some)
                    .map_err(PlotError::from)
            }
        })
        .collect()
}

/// Return a new batch with a non-nullable `Float64` column appended.
///
/// An existing column with the same name is replaced in place, keeping its
/// position in the schema.
pub fn append_f64_column(
    batch: &RecordBatch,
    name: &str,
    values: Vec<f64>,
) -> PlotResult<RecordBatch> {
    if values.len() != batch.num_rows() {
        return Err(PlotError::invalid(format!(
            "column '{}' has {} values but the table has {} rows",
            name,
            values.len(),
            batch.num_rows()
        )));
    }

    let schema = batch.schema();
    let new_field = Arc::new(Field::new(name, DataType::Float64, false));
    let new_array: ArrayRef = Arc::new(Float64Array::from(values));

    let mut fields: Vec<_> = schema.fields().iter().cloned().collect();
    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();

    match schema.index_of(name) {
        Ok(idx) => {
            fields[idx] = new_field;
            columns[idx] = new_array;
        }
        Err(_) => {
            fields.push(new_field);
            columns.push(new_array);
        }
    }

    let schema = Schema::new_with_metadata(fields, schema.metadata().clone());
    Ok(RecordBatch::try_new(Arc::new(schema), columns)?)
}

/// Return a new batch whose rows are `indices` of the input, in that order
pub fn take_rows(batch: &RecordBatch, indices: &[usize]) -> PlotResult<RecordBatch> {
    if let Some(&bad) = indices.iter().find(|&&i| i >= batch.num_rows()) {
        return Err(PlotError::invalid(format!(
            "row index {} out of bounds for table with {} rows",
            bad,
            batch.num_rows()
        )));
    }

    let index_array = UInt64Array::from(indices.iter().map(|&i| i as u64).collect::<Vec<_>>());
    let columns = batch
        .columns()
        .iter()
        .map(|col| take(col.as_ref(), &index_array, None))
        .collect::<Result<Vec<_>, _>>()?;

    let options = RecordBatchOptions::new().with_row_count(Some(indices.len()));
    Ok(RecordBatch::try_new_with_options(
        batch.schema(),
        columns,
        &options,
    )?)
}
