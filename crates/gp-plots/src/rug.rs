//! Density curves over a rug of raw observations
//!
//! The top panel shows one KDE trace per category. The bottom panel shows
//! every observation as a tick, colored to match its trace.

use arrow::record_batch::RecordBatch;

use gp_core::{PlotError, PlotOptions, PlotResult};
use gp_style::{Palette, Rgb};

use crate::grouping::{group_by_category, resolve_palette};
use crate::kde::{gaussian_kde, KdeCurve, KdeSettings};
use crate::render::{PlotRenderer, PlotSpec};

/// Configuration for [`density_rugplot`]
#[derive(Debug, Clone, PartialEq)]
pub struct DensityRugConfig {
    /// Fraction of the figure height given to the rug panel
    pub rug_height: f64,
    /// Opacity of the density fill
    pub alpha: f64,
    pub kde: KdeSettings,
    /// Trace colors; the current aesthetics palette when `None`
    pub palette: Option<Palette>,
    pub options: PlotOptions,
}

impl Default for DensityRugConfig {
    fn default() -> Self {
        Self {
            rug_height: 0.15,
            alpha: 0.5,
            kde: KdeSettings::default(),
            palette: None,
            options: PlotOptions::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DensityTrace {
    pub category: String,
    pub color: Rgb,
    pub curve: KdeCurve,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RugTrace {
    pub category: String,
    pub color: Rgb,
    pub positions: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DensityRugSpec {
    pub value: String,
    pub category: String,
    pub densities: Vec<DensityTrace>,
    pub rugs: Vec<RugTrace>,
    pub rug_height: f64,
    pub alpha: f64,
    pub options: PlotOptions,
}

/// Plot the distribution of `value` for the requested `categories`.
///
/// Categories are drawn in the given order; an empty list selects every
/// category in order of first appearance.
pub fn density_rugplot(
    renderer: &mut dyn PlotRenderer,
    batch: &RecordBatch,
    value: &str,
    category: &str,
    categories: &[&str],
    config: &DensityRugConfig,
) -> PlotResult<DensityRugSpec> {
    tracing::info!(
        "Density/rug plot of '{}' by '{}' for {:?}",
        value,
        category,
        categories
    );
    if !(config.rug_height > 0.0 && config.rug_height < 1.0) {
        return Err(PlotError::invalid(format!(
            "rug_height must be between 0 and 1, got {}",
            config.rug_height
        )));
    }

    let mut groups = group_by_category(batch, value, category)?;
    let selected: Vec<String> = if categories.is_empty() {
        groups.keys().cloned().collect()
    } else {
        categories.iter().map(|c| c.to_string()).collect()
    };

    let palette = resolve_palette(config.palette.as_ref());
    let mut densities = Vec::with_capacity(selected.len());
    let mut rugs = Vec::with_capacity(selected.len());

    for (i, name) in selected.into_iter().enumerate() {
        let values = groups.swap_remove(&name).ok_or_else(|| {
            PlotError::invalid(format!(
                "category '{}' not found in column '{}' (or requested twice)",
                name, category
            ))
        })?;
        let curve = gaussian_kde(&values, &config.kde)
            .map_err(|e| PlotError::invalid(format!("category '{}': {}", name, e)))?;
        let color = palette.color(i);
        tracing::debug!("Trace '{}': {} observations", name, values.len());

        densities.push(DensityTrace {
            category: name.clone(),
            color,
            curve,
        });
        rugs.push(RugTrace {
            category: name,
            color,
            positions: values,
        });
    }

    let spec = DensityRugSpec {
        value: value.to_string(),
        category: category.to_string(),
        densities,
        rugs,
        rug_height: config.rug_height,
        alpha: config.alpha,
        options: config.options.clone(),
    };
    renderer.render(&PlotSpec::DensityRug(spec.clone()))?;
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingRenderer;
    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn diamonds() -> RecordBatch {
        let cuts = ["Ideal", "Fair", "Good"];
        let mut names = Vec::new();
        let mut prices = Vec::new();
        for i in 0..30 {
            names.push(cuts[i % 3]);
            prices.push(300.0 + (i % 3) as f64 * 500.0 + (i * 53 % 200) as f64);
        }
        let schema = Arc::new(Schema::new(vec![
            Field::new("cut", DataType::Utf8, false),
            Field::new("price", DataType::Float64, false),
        ]));
        RecordBatch::try_new(
            schema,
            vec![Arc::new(StringArray::from(names)), Arc::new(Float64Array::from(prices))],
        )
        .unwrap()
    }

    #[test]
    fn test_requested_order_and_shared_colors() -> anyhow::Result<()> {
        let mut renderer = RecordingRenderer::new();
        let spec = density_rugplot(
            &mut renderer,
            &diamonds(),
            "price",
            "cut",
            &["Good", "Ideal"],
            &DensityRugConfig::default(),
        )?;

        let order: Vec<&str> = spec.densities.iter().map(|d| d.category.as_str()).collect();
        assert_eq!(order, vec!["Good", "Ideal"]);
        assert_eq!(spec.rugs.len(), 2);
        for (density, rug) in spec.densities.iter().zip(&spec.rugs) {
            assert_eq!(density.color, rug.color);
            assert_eq!(rug.positions.len(), 10);
        }
        assert_ne!(spec.densities[0].color, spec.densities[1].color);
        assert_eq!(spec.rug_height, 0.15);
        assert_eq!(renderer.specs().len(), 1);
        Ok(())
    }

    #[test]
    fn test_empty_selection_means_all() -> anyhow::Result<()> {
        let mut renderer = RecordingRenderer::new();
        let spec = density_rugplot(&mut renderer, &diamonds(), "price", "cut", &[], &DensityRugConfig::default())?;
        let order: Vec<&str> = spec.rugs.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(order, vec!["Ideal", "Fair", "Good"]);
        Ok(())
    }

    #[test]
    fn test_unknown_category() {
        let mut renderer = RecordingRenderer::new();
        let result = density_rugplot(
            &mut renderer,
            &diamonds(),
            "price",
            "cut",
            &["Premium"],
            &DensityRugConfig::default(),
        );
        assert!(matches!(result, Err(PlotError::InvalidArgument(ref m)) if m.contains("Premium")));
        assert!(renderer.specs().is_empty());
    }

    #[test]
    fn test_rug_height_bounds() {
        let config = DensityRugConfig {
            rug_height: 1.5,
            ..DensityRugConfig::default()
        };
        let mut renderer = RecordingRenderer::new();
        assert!(density_rugplot(&mut renderer, &diamonds(), "price", "cut", &[], &config).is_err());
    }
}
