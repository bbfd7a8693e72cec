//! Density-colored scatter plot recipe

use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use gp_core::{PlotOptions, PlotResult};
use gp_style::{Colormap, Rgb};

use crate::density::{point_density_table, Bins, DENSITY_COLUMN};
use crate::render::{PlotRenderer, PlotSpec};

/// Marker shapes a renderer is asked to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerShape {
    #[default]
    Circle,
    Square,
    Diamond,
    Triangle,
    Cross,
    Plus,
}

/// Configuration for [`point_density_plot`]
#[derive(Debug, Clone, PartialEq)]
pub struct DensityScatterConfig {
    pub bins: Bins,

    /// Point opacity
    pub alpha: f64,

    /// Marker outline; `None` draws no outline
    pub edgecolor: Option<Rgb>,

    pub marker: MarkerShape,

    /// Draw the points as an image in vector output
    pub rasterized: bool,

    /// Colormap applied to the density column
    pub palette: Colormap,

    /// Whether to show legend
    pub show_legend: bool,

    /// Extra renderer options
    pub options: PlotOptions,
}

impl Default for DensityScatterConfig {
    fn default() -> Self {
        Self {
            bins: Bins::default(),
            alpha: 0.6,
            edgecolor: None,
            marker: MarkerShape::Circle,
            rasterized: true,
            palette: Colormap::default(),
            show_legend: false,
            options: PlotOptions::new(),
        }
    }
}

/// Scatter points sorted by density, densest last
#[derive(Debug, Clone)]
pub struct ScatterSpec {
    /// Input rows reordered by density, with the density column appended
    pub data: RecordBatch,
    pub x: String,
    pub y: String,
    /// Column mapped through `palette`
    pub hue: String,
    /// Min and max of the hue column
    pub hue_range: (f64, f64),
    pub alpha: f64,
    pub edgecolor: Option<Rgb>,
    pub marker: MarkerShape,
    pub rasterized: bool,
    pub palette: Colormap,
    pub show_legend: bool,
    pub options: PlotOptions,
}

impl ScatterSpec {
    /// Color of every row, following the table order
    pub fn point_colors(&self) -> PlotResult<Vec<Rgb>> {
        let (lo, hi) = self.hue_range;
        let span = hi - lo;
        Ok(gp_core::dense_numeric_values(&self.data, &self.hue)?
            .into_iter()
            .map(|d| {
                let t = if span > 0.0 { (d - lo) / span } else { 0.0 };
                self.palette.color_at(t)
            })
            .collect())
    }
}

/// Color a scatter plot of `x` against `y` by the local point density.
///
/// The rows are sorted ascending by density so dense regions are drawn on
/// top. The caller's batch is left untouched.
pub fn point_density_plot(
    renderer: &mut dyn PlotRenderer,
    batch: &RecordBatch,
    x: &str,
    y: &str,
    config: &DensityScatterConfig,
) -> PlotResult<ScatterSpec> {
    tracing::info!(
        "Density scatter plot - X: '{}', Y: '{}', bins: {}x{}",
        x,
        y,
        config.bins.x,
        config.bins.y
    );

    let data = point_density_table(batch, x, y, config.bins)?;
    let densities = gp_core::dense_numeric_values(&data, DENSITY_COLUMN)?;
    let hue_range = match (densities.first(), densities.last()) {
        (Some(&lo), Some(&hi)) => (lo, hi),
        _ => (0.0, 0.0),
    };
    tracing::debug!(
        "Density range [{:.4}, {:.4}] over {} points",
        hue_range.0,
        hue_range.1,
        data.num_rows()
    );

    let spec = ScatterSpec {
        data,
        x: x.to_string(),
        y: y.to_string(),
        hue: DENSITY_COLUMN.to_string(),
        hue_range,
        alpha: config.alpha,
        edgecolor: config.edgecolor,
        marker: config.marker,
        rasterized: config.rasterized,
        palette: config.palette.clone(),
        show_legend: config.show_legend,
        options: config.options.clone(),
    };
    renderer.render(&PlotSpec::Scatter(spec.clone()))?;
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingRenderer;
    use arrow::array::Float64Array;
    use arrow::datatypes::{DataType, Field, Schema};
    use gp_style::sequential_cmap;
    use std::sync::Arc;

    fn tips() -> RecordBatch {
        let bills: Vec<f64> = (0..60).map(|i| 10.0 + (i % 12) as f64 * 1.5 + (i / 12) as f64 * 0.3).collect();
        let tips: Vec<f64> = bills.iter().enumerate().map(|(i, b)| b * 0.15 + (i % 5) as f64 * 0.2).collect();
        let schema = Arc::new(Schema::new(vec![
            Field::new("total_bill", DataType::Float64, false),
            Field::new("tip", DataType::Float64, false),
        ]));
        RecordBatch::try_new(
            schema,
            vec![Arc::new(Float64Array::from(bills)), Arc::new(Float64Array::from(tips))],
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = DensityScatterConfig::default();
        assert_eq!(config.alpha, 0.6);
        assert_eq!(config.edgecolor, None);
        assert_eq!(config.marker, MarkerShape::Circle);
        assert!(config.rasterized);
        assert!(!config.show_legend);
        assert_eq!(config.palette.name(), "viridis");
        assert_eq!(config.bins, Bins::new(20, 20));
    }

    #[test]
    fn test_renders_one_sorted_scatter() -> anyhow::Result<()> {
        let batch = tips();
        let config = DensityScatterConfig {
            bins: Bins::new(8, 6),
            palette: sequential_cmap(Some("magma"))?,
            options: PlotOptions::new().with("s", 12),
            ..DensityScatterConfig::default()
        };

        let mut renderer = RecordingRenderer::new();
        let spec = point_density_plot(&mut renderer, &batch, "total_bill", "tip", &config)?;

        assert_eq!(renderer.specs().len(), 1);
        assert!(matches!(renderer.last(), Some(PlotSpec::Scatter(_))));
        assert_eq!(spec.data.num_rows(), 60);
        assert_eq!(spec.hue, "color");
        assert_eq!(spec.palette.name(), "magma");
        assert!(spec.hue_range.0 <= spec.hue_range.1);

        let colors = spec.point_colors()?;
        assert_eq!(colors.len(), 60);
        assert_eq!(colors[59], spec.palette.color_at(1.0));
        Ok(())
    }

    #[test]
    fn test_invalid_bins_render_nothing() {
        let config = DensityScatterConfig {
            bins: Bins::new(0, 5),
            ..DensityScatterConfig::default()
        };
        let mut renderer = RecordingRenderer::new();
        let result = point_density_plot(&mut renderer, &tips(), "total_bill", "tip", &config);
        assert!(result.unwrap_err().is_invalid_argument());
        assert!(renderer.specs().is_empty());
    }
}
