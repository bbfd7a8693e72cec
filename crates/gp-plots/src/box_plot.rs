//! Boxplots annotated with group sizes

use arrow::record_batch::RecordBatch;
use indexmap::IndexMap;

use gp_core::{PlotError, PlotOptions, PlotResult};
use gp_style::{Palette, Rgb};

use crate::grouping::{group_by_category, non_null_values, resolve_palette};
use crate::render::{PlotRenderer, PlotSpec};
use crate::stats::{sort_labels, BoxStats};

/// Label of the single group drawn when no category column is given
pub const ALL_GROUP: &str = "all";

/// Configuration for [`annotated_boxplot`]
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlotConfig {
    /// Whisker reach in interquartile ranges
    pub whis: f64,

    /// Whether to show outliers
    pub show_outliers: bool,

    /// Add the median to each box label
    pub annotate_median: bool,

    /// Decimal places for the median label
    pub precision: usize,

    /// Box colors; the current aesthetics palette when `None`
    pub palette: Option<Palette>,

    pub options: PlotOptions,
}

impl Default for BoxPlotConfig {
    fn default() -> Self {
        Self {
            whis: 1.5,
            show_outliers: true,
            annotate_median: false,
            precision: 2,
            palette: None,
            options: PlotOptions::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxGroup {
    pub label: String,
    pub color: Rgb,
    pub stats: BoxStats,
    /// Text drawn above the box
    pub annotation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlotSpec {
    pub value: String,
    pub category: Option<String>,
    pub groups: Vec<BoxGroup>,
    pub show_outliers: bool,
    pub options: PlotOptions,
}

fn box_label(stats: &BoxStats, config: &BoxPlotConfig) -> String {
    let mut label = format!("n = {}", stats.n);
    if config.annotate_median {
        label.push_str(&format!("\nmedian = {:.*}", config.precision, stats.median));
    }
    label
}

/// Draw one box per category (sorted by label), each labelled with its
/// sample size
pub fn annotated_boxplot(
    renderer: &mut dyn PlotRenderer,
    batch: &RecordBatch,
    value: &str,
    category: Option<&str>,
    config: &BoxPlotConfig,
) -> PlotResult<BoxPlotSpec> {
    tracing::info!("Box plot of '{}' by {:?}", value, category);

    let mut groups: IndexMap<String, Vec<f64>> = match category {
        Some(column) => group_by_category(batch, value, column)?,
        None => IndexMap::from([(ALL_GROUP.to_string(), non_null_values(batch, value)?)]),
    };

    let mut labels: Vec<String> = groups.keys().cloned().collect();
    sort_labels(&mut labels);

    let palette = resolve_palette(config.palette.as_ref());
    let mut boxes = Vec::with_capacity(labels.len());
    for (i, label) in labels.into_iter().enumerate() {
        let values = groups
            .swap_remove(&label)
            .ok_or_else(|| PlotError::invalid(format!("group '{}' disappeared", label)))?;
        let stats = BoxStats::from_values(&values, config.whis)?;
        tracing::debug!(
            "Box '{}': n={}, median={:.3}, {} outliers",
            label,
            stats.n,
            stats.median,
            stats.outliers.len()
        );
        boxes.push(BoxGroup {
            annotation: box_label(&stats, config),
            color: palette.color(i),
            label,
            stats,
        });
    }

    let spec = BoxPlotSpec {
        value: value.to_string(),
        category: category.map(str::to_string),
        groups: boxes,
        show_outliers: config.show_outliers,
        options: config.options.clone(),
    };
    renderer.render(&PlotSpec::BoxPlot(spec.clone()))?;
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingRenderer;
    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn mpg() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("class", DataType::Utf8, true),
            Field::new("hwy", DataType::Float64, true),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec![
                    Some("suv"),
                    Some("compact"),
                    Some("suv"),
                    Some("compact"),
                    Some("compact"),
                    None,
                    Some("suv"),
                ])),
                Arc::new(Float64Array::from(vec![
                    Some(17.0),
                    Some(29.0),
                    Some(19.0),
                    Some(27.0),
                    None,
                    Some(40.0),
                    Some(20.0),
                ])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_groups_sorted_and_annotated() -> anyhow::Result<()> {
        let config = BoxPlotConfig {
            annotate_median: true,
            ..BoxPlotConfig::default()
        };
        let mut renderer = RecordingRenderer::new();
        let spec = annotated_boxplot(&mut renderer, &mpg(), "hwy", Some("class"), &config)?;

        let labels: Vec<&str> = spec.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["compact", "suv"]);

        let compact = &spec.groups[0];
        assert_eq!(compact.stats.n, 2);
        assert_eq!(compact.annotation, "n = 2\nmedian = 28.00");

        let suv = &spec.groups[1];
        assert_eq!(suv.stats.median, 19.0);
        assert_eq!(suv.annotation, "n = 3\nmedian = 19.00");
        assert_eq!(spec.category.as_deref(), Some("class"));
        assert_eq!(renderer.specs().len(), 1);
        Ok(())
    }

    #[test]
    fn test_without_category_uses_one_group() -> anyhow::Result<()> {
        let mut renderer = RecordingRenderer::new();
        let spec = annotated_boxplot(&mut renderer, &mpg(), "hwy", None, &BoxPlotConfig::default())?;

        assert_eq!(spec.groups.len(), 1);
        assert_eq!(spec.groups[0].label, ALL_GROUP);
        assert_eq!(spec.groups[0].stats.n, 6);
        assert_eq!(spec.groups[0].annotation, "n = 6");
        Ok(())
    }

    #[test]
    fn test_outliers_are_reported() -> anyhow::Result<()> {
        let schema = Arc::new(Schema::new(vec![Field::new("v", DataType::Float64, false)]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 100.0]))],
        )?;
        let mut renderer = RecordingRenderer::new();
        let spec = annotated_boxplot(&mut renderer, &batch, "v", None, &BoxPlotConfig::default())?;
        assert_eq!(spec.groups[0].stats.outliers, vec![100.0]);
        assert_eq!(spec.groups[0].stats.upper_whisker, 8.0);
        assert!(spec.show_outliers);
        Ok(())
    }

    #[test]
    fn test_non_numeric_value_column() {
        let mut renderer = RecordingRenderer::new();
        let result = annotated_boxplot(&mut renderer, &mpg(), "class", None, &BoxPlotConfig::default());
        assert!(matches!(result, Err(PlotError::UnsupportedColumnType { .. })));
    }
}
