//! Grouping numeric values by a category column

use arrow::record_batch::RecordBatch;
use indexmap::IndexMap;

use gp_core::{category_values, numeric_values, PlotError, PlotResult};
use gp_style::{current_aesthetics, Palette};

/// Values of `value` grouped by `category`, in order of first appearance.
///
/// Rows with a null in either column or a `NaN` value are skipped.
pub fn group_by_category(
    batch: &RecordBatch,
    value: &str,
    category: &str,
) -> PlotResult<IndexMap<String, Vec<f64>>> {
    let values = numeric_values(batch, value)?;
    let categories = category_values(batch, category)?;

    let mut groups: IndexMap<String, Vec<f64>> = IndexMap::new();
    let mut skipped = 0usize;
    let mut nan = 0usize;
    for (v, c) in values.into_iter().zip(categories) {
        match (v, c) {
            (Some(v), Some(_)) if v.is_nan() => nan += 1,
            (Some(v), Some(c)) => groups.entry(c).or_default().push(v),
            _ => skipped += 1,
        }
    }

    if nan > 0 {
        tracing::warn!("Skipped {} rows with a NaN '{}'", nan, value);
    }
    if skipped > 0 {
        tracing::warn!(
            "Skipped {} rows with a null '{}' or '{}'",
            skipped,
            value,
            category
        );
    }
    if groups.is_empty() {
        return Err(PlotError::invalid(format!(
            "no non-null rows to group '{}' by '{}'",
            value, category
        )));
    }
    tracing::debug!("Grouped '{}' into {} '{}' groups", value, groups.len(), category);
    Ok(groups)
}

/// Non-null, non-`NaN` values of a numeric column
pub fn non_null_values(batch: &RecordBatch, value: &str) -> PlotResult<Vec<f64>> {
    let present: Vec<f64> = numeric_values(batch, value)?.into_iter().flatten().collect();
    let total = present.len();
    let values: Vec<f64> = present.into_iter().filter(|v| !v.is_nan()).collect();
    if values.len() < total {
        tracing::warn!("Skipped {} NaN values in '{}'", total - values.len(), value);
    }
    if values.is_empty() {
        return Err(PlotError::invalid(format!("column '{}' has no non-null values", value)));
    }
    Ok(values)
}

/// The palette a recipe should use: its own override or the current
/// aesthetics palette
pub fn resolve_palette(palette: Option<&Palette>) -> Palette {
    palette.cloned().unwrap_or_else(|| current_aesthetics().palette)
}
