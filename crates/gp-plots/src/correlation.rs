//! Correlation coefficients and plot annotations

use std::fmt;
use std::str::FromStr;

use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use gp_core::{dense_numeric_values, PlotError, PlotOptions, PlotResult};

use crate::render::{PlotRenderer, PlotSpec};
use crate::stats::average_ranks;

/// Supported correlation methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    #[default]
    Pearson,
    Spearman,
}

impl CorrelationMethod {
    /// Symbol used in annotations
    pub fn symbol(&self) -> &'static str {
        match self {
            CorrelationMethod::Pearson => "r",
            CorrelationMethod::Spearman => "ρ",
        }
    }
}

impl fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelationMethod::Pearson => f.write_str("pearson"),
            CorrelationMethod::Spearman => f.write_str("spearman"),
        }
    }
}

impl FromStr for CorrelationMethod {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pearson" => Ok(CorrelationMethod::Pearson),
            "spearman" => Ok(CorrelationMethod::Spearman),
            other => Err(PlotError::invalid(format!(
                "unsupported correlation method '{}', expected 'pearson' or 'spearman'",
                other
            ))),
        }
    }
}

/// A correlation coefficient with its two-sided p-value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub method: CorrelationMethod,
    pub coefficient: f64,
    pub p_value: f64,
    pub n: usize,
}

/// Correlate two equally long samples.
///
/// Spearman's coefficient is Pearson's on average ranks. Both use a Student's
/// t test with `n - 2` degrees of freedom for the p-value.
pub fn correlation(xs: &[f64], ys: &[f64], method: CorrelationMethod) -> PlotResult<Correlation> {
    if xs.len() != ys.len() {
        return Err(PlotError::invalid(format!(
            "samples have different lengths ({} and {})",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < 2 {
        return Err(PlotError::invalid(format!(
            "correlation needs at least 2 observations, got {}",
            xs.len()
        )));
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(PlotError::invalid("correlation input must be finite"));
    }

    let coefficient = match method {
        CorrelationMethod::Pearson => pearson(xs, ys)?,
        CorrelationMethod::Spearman => pearson(&average_ranks(xs), &average_ranks(ys))?,
    };
    let p_value = t_test_p_value(coefficient, xs.len())?;

    Ok(Correlation {
        method,
        coefficient,
        p_value,
        n: xs.len(),
    })
}

fn pearson(x: &[f64], y: &[f64]) -> PlotResult<f64> {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for i in 0..x.len() {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return Err(PlotError::invalid(
            "correlation is undefined for a constant column",
        ));
    }
    Ok((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}

fn t_test_p_value(r: f64, n: usize) -> PlotResult<f64> {
    if n == 2 {
        return Ok(1.0);
    }
    if r.abs() >= 1.0 {
        return Ok(0.0);
    }

    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r * r)).sqrt();
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| PlotError::Numerical(format!("Student's t with {} dof: {}", df, e)))?;
    Ok((2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0))
}

/// Correlate two numeric columns of `batch`.
///
/// `method` is `"pearson"` or `"spearman"` (case-insensitive); anything else
/// is rejected before the columns are read.
pub fn calculate_correlation(batch: &RecordBatch, x: &str, y: &str, method: &str) -> PlotResult<Correlation> {
    let method: CorrelationMethod = method.parse()?;
    let xs = dense_numeric_values(batch, x)?;
    let ys = dense_numeric_values(batch, y)?;
    correlation(&xs, &ys, method)
}

/// Where an annotation is anchored, in axes-fraction coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationLoc {
    #[default]
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
    Center,
}

impl AnnotationLoc {
    /// Anchor point with a 5% inset from the axes border
    pub fn anchor(&self) -> (f64, f64) {
        match self {
            AnnotationLoc::UpperLeft => (0.05, 0.95),
            AnnotationLoc::UpperRight => (0.95, 0.95),
            AnnotationLoc::LowerLeft => (0.05, 0.05),
            AnnotationLoc::LowerRight => (0.95, 0.05),
            AnnotationLoc::Center => (0.5, 0.5),
        }
    }
}

/// A text label placed in axes-fraction coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct TextAnnotation {
    pub text: String,
    pub loc: AnnotationLoc,
    pub position: (f64, f64),
    /// Font size, color and other text options, forwarded verbatim
    pub options: PlotOptions,
}

/// Configuration for [`add_correlation`]
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationAnnotationConfig {
    pub method: CorrelationMethod,
    pub loc: AnnotationLoc,
    /// Add the p-value on a second line
    pub print_p: bool,
    /// Decimal places for the coefficient
    pub precision: usize,
    pub options: PlotOptions,
}

impl Default for CorrelationAnnotationConfig {
    fn default() -> Self {
        Self {
            method: CorrelationMethod::Pearson,
            loc: AnnotationLoc::UpperLeft,
            print_p: false,
            precision: 2,
            options: PlotOptions::new(),
        }
    }
}

/// Annotation text such as `r = 0.89` or `ρ = 0.88\np = 1.23e-5`
pub fn format_correlation(corr: &Correlation, print_p: bool, precision: usize) -> String {
    let mut text = format!("{} = {:.*}", corr.method.symbol(), precision, corr.coefficient);
    if print_p {
        text.push_str(&format!("\np = {:.2e}", corr.p_value));
    }
    text
}

/// Compute the correlation between two columns and hand a text annotation
/// to the renderer
pub fn add_correlation(
    renderer: &mut dyn PlotRenderer,
    batch: &RecordBatch,
    x: &str,
    y: &str,
    config: &CorrelationAnnotationConfig,
) -> PlotResult<TextAnnotation> {
    tracing::info!("Annotating {} correlation of '{}' and '{}'", config.method, x, y);

    let xs = dense_numeric_values(batch, x)?;
    let ys = dense_numeric_values(batch, y)?;
    let corr = correlation(&xs, &ys, config.method)?;
    tracing::debug!(
        "{} = {:.4}, p = {:.3e}, n = {}",
        config.method,
        corr.coefficient,
        corr.p_value,
        corr.n
    );

    let annotation = TextAnnotation {
        text: format_correlation(&corr, config.print_p, config.precision),
        loc: config.loc,
        position: config.loc.anchor(),
        options: config.options.clone(),
    };
    renderer.render(&PlotSpec::Text(annotation.clone()))?;
    Ok(annotation)
}
