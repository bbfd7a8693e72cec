//! Stacked bar chart recipe

use ahash::AHashMap;
use arrow::record_batch::RecordBatch;

use gp_core::{category_values, numeric_values, PlotError, PlotOptions, PlotResult};
use gp_style::{Palette, Rgb};

use crate::grouping::resolve_palette;
use crate::render::{PlotRenderer, PlotSpec};
use crate::stats::sort_labels;

/// Configuration for [`stacked_barplot`]
#[derive(Debug, Clone, PartialEq)]
pub struct BarConfig {
    /// Draw bars horizontally
    pub horizontal: bool,
    pub show_legend: bool,
    pub title: Option<String>,
    /// Category axis label; the category column name when `None`
    pub category_label: Option<String>,
    /// Value axis label; the value column name when `None`
    pub value_label: Option<String>,
    /// Series colors; the current aesthetics palette when `None`
    pub palette: Option<Palette>,
    pub options: PlotOptions,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            horizontal: false,
            show_legend: true,
            title: None,
            category_label: None,
            value_label: None,
            palette: None,
            options: PlotOptions::new(),
        }
    }
}

/// One layer of the stack
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub label: String,
    pub color: Rgb,
    /// Segment length per category
    pub values: Vec<f64>,
    /// Where each segment starts
    pub bottoms: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackedBarSpec {
    pub categories: Vec<String>,
    /// Bottom to top
    pub series: Vec<BarSeries>,
    pub horizontal: bool,
    pub show_legend: bool,
    pub title: Option<String>,
    pub category_label: String,
    pub value_label: String,
    pub options: PlotOptions,
}

impl StackedBarSpec {
    /// Height of each bar
    pub fn totals(&self) -> Vec<f64> {
        (0..self.categories.len())
            .map(|i| self.series.iter().map(|s| s.values[i]).sum())
            .collect()
    }
}

/// Sum `value` per `category` and `stack` and stack the series per category.
///
/// Duplicate cells are summed and missing cells count as zero. Categories
/// and stacks are sorted, numerically when every label is a number.
pub fn stacked_barplot(
    renderer: &mut dyn PlotRenderer,
    batch: &RecordBatch,
    category: &str,
    stack: &str,
    value: &str,
    config: &BarConfig,
) -> PlotResult<StackedBarSpec> {
    tracing::info!(
        "Stacked bar chart - Category: '{}', Stack: '{}', Value: '{}'",
        category,
        stack,
        value
    );

    let categories = category_values(batch, category)?;
    let stacks = category_values(batch, stack)?;
    let values = numeric_values(batch, value)?;

    let mut cells: AHashMap<(String, String), f64> = AHashMap::new();
    let mut skipped = 0usize;
    for ((c, s), v) in categories.into_iter().zip(stacks).zip(values) {
        match (c, s, v) {
            (Some(c), Some(s), Some(v)) => *cells.entry((c, s)).or_insert(0.0) += v,
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::debug!("Skipped {} rows with null cells", skipped);
    }
    if cells.is_empty() {
        return Err(PlotError::invalid(format!(
            "no complete rows for '{}' x '{}'",
            category, stack
        )));
    }

    let mut category_labels: Vec<String> = cells.keys().map(|(c, _)| c.clone()).collect();
    category_labels.sort();
    category_labels.dedup();
    sort_labels(&mut category_labels);

    let mut stack_labels: Vec<String> = cells.keys().map(|(_, s)| s.clone()).collect();
    stack_labels.sort();
    stack_labels.dedup();
    sort_labels(&mut stack_labels);

    tracing::info!(
        "Pivoted {} cells into {} categories x {} stacks",
        cells.len(),
        category_labels.len(),
        stack_labels.len()
    );

    let palette = resolve_palette(config.palette.as_ref());
    let mut running = vec![0.0; category_labels.len()];
    let series = stack_labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| {
            let values: Vec<f64> = category_labels
                .iter()
                .map(|c| cells.get(&(c.clone(), label.clone())).copied().unwrap_or(0.0))
                .collect();
            let bottoms = running.clone();
            for (total, v) in running.iter_mut().zip(&values) {
                *total += v;
            }
            BarSeries {
                color: palette.color(i),
                label,
                values,
                bottoms,
            }
        })
        .collect();

    let spec = StackedBarSpec {
        categories: category_labels,
        series,
        horizontal: config.horizontal,
        show_legend: config.show_legend,
        title: config.title.clone(),
        category_label: config.category_label.clone().unwrap_or_else(|| category.to_string()),
        value_label: config.value_label.clone().unwrap_or_else(|| value.to_string()),
        options: config.options.clone(),
    };
    renderer.render(&PlotSpec::StackedBar(spec.clone()))?;
    Ok(spec)
}
