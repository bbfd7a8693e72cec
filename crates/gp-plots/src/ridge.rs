//! Ridge plot recipe: one KDE row per category, overlapping vertically

use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use gp_core::{PlotError, PlotOptions, PlotResult};
use gp_style::{AxesStyle, Palette, Rgb};

use crate::grouping::{group_by_category, resolve_palette};
use crate::kde::{gaussian_kde, KdeCurve, KdeSettings};
use crate::render::{PlotRenderer, PlotSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    #[default]
    Center,
    Bottom,
    Baseline,
}

/// Configuration for [`ridgeplot`]
#[derive(Debug, Clone, PartialEq)]
pub struct RidgeConfig {
    /// Width of each row relative to its height
    pub aspect: f64,
    /// Height of each row in inches
    pub height: f64,
    /// Fill opacity
    pub alpha: f64,
    /// Row label position in axes coordinates
    pub text_xpos: f64,
    pub text_ypos: f64,
    pub text_ha: HorizontalAlign,
    pub text_va: VerticalAlign,
    /// Outline width
    pub lw: f64,
    /// Vertical spacing between rows; negative values overlap them
    pub hspace: f64,
    pub kde: KdeSettings,
    /// Row colors; the current aesthetics palette when `None`
    pub palette: Option<Palette>,
    pub options: PlotOptions,
}

impl Default for RidgeConfig {
    fn default() -> Self {
        Self {
            aspect: 5.0,
            height: 1.0,
            alpha: 0.7,
            text_xpos: 0.0,
            text_ypos: 0.2,
            text_ha: HorizontalAlign::Left,
            text_va: VerticalAlign::Center,
            lw: 0.5,
            hspace: -0.25,
            kde: KdeSettings::default(),
            palette: None,
            options: PlotOptions::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RidgeRow {
    pub label: String,
    pub color: Rgb,
    pub n: usize,
    pub curve: KdeCurve,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RidgeSpec {
    pub x: String,
    pub hue: String,
    /// Top to bottom
    pub rows: Vec<RidgeRow>,
    pub aspect: f64,
    pub height: f64,
    pub alpha: f64,
    pub lw: f64,
    pub label_position: (f64, f64),
    pub text_ha: HorizontalAlign,
    pub text_va: VerticalAlign,
    pub hspace: f64,
    /// Style for this figure only; the process-wide aesthetics are untouched
    pub style: AxesStyle,
    pub transparent_background: bool,
    pub show_yticks: bool,
    pub despine: bool,
    pub options: PlotOptions,
}

impl RidgeSpec {
    /// Range covered by every row's curve
    pub fn x_range(&self) -> Option<(f64, f64)> {
        let lo = self
            .rows
            .iter()
            .filter_map(|r| r.curve.support.first().copied())
            .reduce(f64::min)?;
        let hi = self
            .rows
            .iter()
            .filter_map(|r| r.curve.support.last().copied())
            .reduce(f64::max)?;
        Some((lo, hi))
    }
}

/// Draw one density row per `hue` category, in order of first appearance
pub fn ridgeplot(
    renderer: &mut dyn PlotRenderer,
    batch: &RecordBatch,
    x: &str,
    hue: &str,
    config: &RidgeConfig,
) -> PlotResult<RidgeSpec> {
    tracing::info!("Ridge plot of '{}' by '{}'", x, hue);
    if !(config.aspect > 0.0 && config.height > 0.0) {
        return Err(PlotError::invalid(format!(
            "ridge rows need a positive size, got aspect={} height={}",
            config.aspect, config.height
        )));
    }

    let groups = group_by_category(batch, x, hue)?;
    let palette = resolve_palette(config.palette.as_ref());

    let rows = groups
        .into_iter()
        .enumerate()
        .map(|(i, (label, values))| {
            let curve = gaussian_kde(&values, &config.kde).map_err(|e| {
                PlotError::invalid(format!("ridge row '{}': {}", label, e))
            })?;
            tracing::debug!("Ridge row '{}': {} values", label, values.len());
            Ok(RidgeRow {
                color: palette.color(i),
                n: values.len(),
                label,
                curve,
            })
        })
        .collect::<PlotResult<Vec<_>>>()?;

    let spec = RidgeSpec {
        x: x.to_string(),
        hue: hue.to_string(),
        rows,
        aspect: config.aspect,
        height: config.height,
        alpha: config.alpha,
        lw: config.lw,
        label_position: (config.text_xpos, config.text_ypos),
        text_ha: config.text_ha,
        text_va: config.text_va,
        hspace: config.hspace,
        style: AxesStyle::White,
        transparent_background: true,
        show_yticks: false,
        despine: true,
        options: config.options.clone(),
    };
    renderer.render(&PlotSpec::Ridge(spec.clone()))?;
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingRenderer;
    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use gp_style::{current_aesthetics, discrete_palette};
    use std::sync::Arc;

    fn penguins() -> RecordBatch {
        let species = ["Gentoo", "Adelie", "Chinstrap"];
        let mut names = Vec::new();
        let mut mass = Vec::new();
        for i in 0..45 {
            let s = i % 3;
            names.push(species[s]);
            mass.push(3500.0 + s as f64 * 800.0 + (i as f64 * 37.0) % 400.0);
        }
        let schema = Arc::new(Schema::new(vec![
            Field::new("species", DataType::Utf8, false),
            Field::new("body_mass_g", DataType::Float64, false),
        ]));
        RecordBatch::try_new(
            schema,
            vec![Arc::new(StringArray::from(names)), Arc::new(Float64Array::from(mass))],
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = RidgeConfig::default();
        assert_eq!((config.aspect, config.height, config.alpha), (5.0, 1.0, 0.7));
        assert_eq!((config.text_xpos, config.text_ypos), (0.0, 0.2));
        assert_eq!(config.text_ha, HorizontalAlign::Left);
        assert_eq!(config.text_va, VerticalAlign::Center);
        assert_eq!((config.lw, config.hspace), (0.5, -0.25));
    }

    #[test]
    fn test_rows_follow_first_appearance() -> anyhow::Result<()> {
        let mut renderer = RecordingRenderer::new();
        let spec = ridgeplot(&mut renderer, &penguins(), "body_mass_g", "species", &RidgeConfig::default())?;

        let labels: Vec<&str> = spec.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Gentoo", "Adelie", "Chinstrap"]);
        assert!(spec.rows.iter().all(|r| r.n == 15 && r.curve.support.len() == 200));

        let palette = current_aesthetics().palette;
        assert_eq!(spec.rows[1].color, palette.color(1));
        assert_eq!(spec.style, AxesStyle::White);
        assert!(spec.transparent_background);
        assert_eq!(spec.label_position, (0.0, 0.2));

        let (lo, hi) = spec.x_range().unwrap();
        assert!(lo < 3500.0 && hi > 5484.0);
        assert_eq!(renderer.specs().len(), 1);
        Ok(())
    }

    #[test]
    fn test_palette_override() -> anyhow::Result<()> {
        let config = RidgeConfig {
            palette: Some(discrete_palette("Dark2", 3)?),
            ..RidgeConfig::default()
        };
        let mut renderer = RecordingRenderer::new();
        let spec = ridgeplot(&mut renderer, &penguins(), "body_mass_g", "species", &config)?;
        assert_eq!(spec.rows[2].color, discrete_palette("Dark2", 3)?.color(2));
        Ok(())
    }

    #[test]
    fn test_group_without_spread_is_rejected() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("g", DataType::Utf8, false),
            Field::new("v", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["a", "a", "b"])),
                Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0])),
            ],
        )
        .unwrap();

        let mut renderer = RecordingRenderer::new();
        let err = ridgeplot(&mut renderer, &batch, "v", "g", &RidgeConfig::default()).unwrap_err();
        assert!(matches!(err, PlotError::InvalidArgument(ref m) if m.contains("'b'")));
        assert!(renderer.specs().is_empty());
    }
}
