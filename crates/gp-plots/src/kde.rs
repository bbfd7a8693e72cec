//! One-dimensional Gaussian kernel density estimation

use serde::{Deserialize, Serialize};

use gp_core::{PlotError, PlotResult};

use crate::stats::sample_std;

/// Grid and bandwidth settings for a KDE curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdeSettings {
    /// Number of evaluation points
    pub grid_size: usize,
    /// How far past the data the grid extends, in bandwidths
    pub cut: f64,
    /// Multiplier on Scott's bandwidth
    pub bw_adjust: f64,
}

impl Default for KdeSettings {
    fn default() -> Self {
        Self {
            grid_size: 200,
            cut: 3.0,
            bw_adjust: 1.0,
        }
    }
}

/// A density curve sampled on an even grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KdeCurve {
    pub support: Vec<f64>,
    pub density: Vec<f64>,
    pub bandwidth: f64,
}

impl KdeCurve {
    /// Largest density value on the grid
    pub fn peak(&self) -> f64 {
        self.density.iter().copied().fold(0.0, f64::max)
    }
}

/// Estimate a density with a Gaussian kernel and Scott's rule bandwidth,
/// `σ · n^(-1/5)`
pub fn gaussian_kde(values: &[f64], settings: &KdeSettings) -> PlotResult<KdeCurve> {
    if settings.grid_size < 2 {
        return Err(PlotError::invalid("KDE grid needs at least 2 points"));
    }
    if !(settings.cut.is_finite() && settings.cut >= 0.0) {
        return Err(PlotError::invalid(format!("KDE cut must be non-negative, got {}", settings.cut)));
    }
    if !(settings.bw_adjust.is_finite() && settings.bw_adjust > 0.0) {
        return Err(PlotError::invalid(format!(
            "bandwidth adjustment must be positive, got {}",
            settings.bw_adjust
        )));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(PlotError::invalid("KDE input must be finite"));
    }

    let std_dev = sample_std(values).unwrap_or(0.0);
    if std_dev <= 0.0 {
        return Err(PlotError::invalid(format!(
            "KDE needs at least two distinct values, got {} value(s)",
            values.len()
        )));
    }

    let n = values.len() as f64;
    let bandwidth = settings.bw_adjust * std_dev * n.powf(-0.2);

    let min_val = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max_val = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let kde_min = min_val - settings.cut * bandwidth;
    let kde_max = max_val + settings.cut * bandwidth;
    let steps = settings.grid_size;

    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let support: Vec<f64> = (0..steps)
        .map(|i| kde_min + (kde_max - kde_min) * i as f64 / (steps - 1) as f64)
        .collect();
    let density = support
        .iter()
        .map(|&x| {
            norm * values
                .iter()
                .map(|&v| {
                    let u = (x - v) / bandwidth;
                    (-0.5 * u * u).exp()
                })
                .sum::<f64>()
        })
        .collect();

    tracing::debug!(
        "KDE over {} values: bandwidth={:.4}, grid=[{:.3}, {:.3}]",
        values.len(),
        bandwidth,
        kde_min,
        kde_max
    );

    Ok(KdeCurve {
        support,
        density,
        bandwidth,
    })
}
