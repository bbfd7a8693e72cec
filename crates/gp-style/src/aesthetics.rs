//! Process-wide plotting aesthetics
//!
//! The aesthetics are shared, mutable rendering configuration. They are set
//! explicitly with [`set_aesthetics`] and never torn down. Recipes read a
//! snapshot with [`current_aesthetics`] when they pick series colors.
//! Mutating them from several threads at once is not supported.

use gp_core::{PlotError, PlotOptions, PlotResult};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::palette::{Palette, DEFAULT_PALETTE};

/// Axes style presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxesStyle {
    Darkgrid,
    Whitegrid,
    Dark,
    White,
    #[default]
    Ticks,
}

/// Scaling context presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotContext {
    Paper,
    #[default]
    Notebook,
    Talk,
    Poster,
}

impl PlotContext {
    /// Font and line scaling relative to `notebook`
    pub fn scale(&self) -> f64 {
        match self {
            PlotContext::Paper => 0.8,
            PlotContext::Notebook => 1.0,
            PlotContext::Talk => 1.5,
            PlotContext::Poster => 2.0,
        }
    }
}

/// Rendering configuration shared by all recipes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Aesthetics {
    pub style: AxesStyle,
    pub context: PlotContext,
    /// Font family
    pub font: String,
    pub font_scale: f64,
    /// Discrete palette for categorical series
    pub palette: Palette,
    /// TrueType embedding for PDF output
    pub pdf_fonttype: u8,
    /// Backend parameters applied verbatim, every entry
    pub rc: PlotOptions,
}

impl Default for Aesthetics {
    fn default() -> Self {
        Self {
            style: AxesStyle::default(),
            context: PlotContext::default(),
            font: "Arial".to_string(),
            font_scale: 1.0,
            palette: DEFAULT_PALETTE.clone(),
            pdf_fonttype: 42,
            rc: PlotOptions::new(),
        }
    }
}

impl Aesthetics {
    /// Parse aesthetics from JSON; missing fields take their defaults
    pub fn from_json_str(text: &str) -> PlotResult<Self> {
        let aesthetics: Self = serde_json::from_str(text)
            .map_err(|e| PlotError::invalid(format!("invalid aesthetics: {}", e)))?;
        aesthetics.validate()?;
        Ok(aesthetics)
    }

    pub fn to_json_string(&self) -> PlotResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PlotError::invalid(e.to_string()))
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> PlotResult<()> {
        if !(self.font_scale.is_finite() && self.font_scale > 0.0) {
            return Err(PlotError::invalid(format!(
                "font_scale must be positive, got {}",
                self.font_scale
            )));
        }
        if self.palette.is_empty() {
            return Err(PlotError::invalid("palette must contain at least one color"));
        }
        Ok(())
    }

    /// Context scale multiplied by the user font scale
    pub fn effective_font_scale(&self) -> f64 {
        self.context.scale() * self.font_scale
    }
}

static AESTHETICS: Lazy<RwLock<Aesthetics>> = Lazy::new(|| RwLock::new(Aesthetics::default()));

/// Replace the process-wide aesthetics
pub fn set_aesthetics(aesthetics: Aesthetics) -> PlotResult<()> {
    aesthetics.validate()?;
    tracing::info!(
        "Setting aesthetics: style={:?}, context={:?}, font='{}', palette={}",
        aesthetics.style,
        aesthetics.context,
        aesthetics.font,
        aesthetics.palette.name
    );
    for (key, value) in aesthetics.rc.iter() {
        tracing::debug!("  rc {} = {}", key, value);
    }
    *AESTHETICS.write() = aesthetics;
    Ok(())
}

/// Snapshot of the process-wide aesthetics
pub fn current_aesthetics() -> Aesthetics {
    AESTHETICS.read().clone()
}
