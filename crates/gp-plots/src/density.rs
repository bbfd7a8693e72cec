//! Per-point density estimates for scatter coloring
//!
//! Points are binned into a normalized 2-D histogram, a bicubic spline is
//! fitted through the bin centers, and the spline is evaluated back at every
//! point. Points outside the bin-center grid get zero density. The result is
//! sorted ascending so the densest points are drawn last.

use arrow::record_batch::RecordBatch;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use gp_core::{append_f64_column, dense_numeric_values, take_rows, PlotError, PlotResult};

use crate::spline::{BicubicSurface, SplineAxis};

/// Name of the column holding the density in [`point_density_table`] output
pub const DENSITY_COLUMN: &str = "color";

/// Number of histogram bins along each axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bins {
    pub x: usize,
    pub y: usize,
}

impl Default for Bins {
    fn default() -> Self {
        Self { x: 20, y: 20 }
    }
}

impl Bins {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Same bin count on both axes
    pub fn square(n: usize) -> Self {
        Self { x: n, y: n }
    }

    pub fn validate(&self) -> PlotResult<()> {
        if self.x == 0 || self.y == 0 {
            return Err(PlotError::invalid(format!(
                "bin counts must be at least 1, got ({}, {})",
                self.x, self.y
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A point with its estimated density and its position in the input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotatedPoint {
    /// Index of the point in the input slice
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub density: f64,
}

/// A 2-D histogram normalized to a probability density
#[derive(Debug, Clone)]
pub struct Histogram2d {
    x_edges: Array1<f64>,
    y_edges: Array1<f64>,
    /// `density[[i, j]]` covers x bin `i` and y bin `j`
    density: Array2<f64>,
}

impl Histogram2d {
    /// Bin `points` with equal-width bins spanning each axis' range.
    ///
    /// A degenerate axis (all values equal) is widened by 0.5 on both sides,
    /// or more at magnitudes where that is below float resolution. An axis
    /// whose spread is too small to separate the bin centers is widened the
    /// same way around its midpoint.
    /// Values equal to the upper edge fall in the last bin.
    pub fn build(points: &[Point], bins: Bins) -> PlotResult<Self> {
        bins.validate()?;
        if points.is_empty() {
            return Err(PlotError::invalid("cannot bin an empty point set"));
        }
        if let Some(p) = points.iter().find(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(PlotError::invalid(format!(
                "point coordinates must be finite, got ({}, {})",
                p.x, p.y
            )));
        }

        let x_edges = axis_edges(points.iter().map(|p| p.x), bins.x);
        let y_edges = axis_edges(points.iter().map(|p| p.y), bins.y);

        let mut counts = Array2::<f64>::zeros((bins.x, bins.y));
        for p in points {
            let i = bin_index(p.x, &x_edges);
            let j = bin_index(p.y, &y_edges);
            counts[[i, j]] += 1.0;
        }

        let total = points.len() as f64;
        let density = Array2::from_shape_fn((bins.x, bins.y), |(i, j)| {
            let area = (x_edges[i + 1] - x_edges[i]) * (y_edges[j + 1] - y_edges[j]);
            counts[[i, j]] / (total * area)
        });

        Ok(Self {
            x_edges,
            y_edges,
            density,
        })
    }

    pub fn x_edges(&self) -> &Array1<f64> {
        &self.x_edges
    }

    pub fn y_edges(&self) -> &Array1<f64> {
        &self.y_edges
    }

    pub fn density(&self) -> &Array2<f64> {
        &self.density
    }

    pub fn x_centers(&self) -> Vec<f64> {
        centers(&self.x_edges)
    }

    pub fn y_centers(&self) -> Vec<f64> {
        centers(&self.y_edges)
    }

    /// Integral of the density over all bins; 1 up to rounding
    pub fn total_mass(&self) -> f64 {
        self.density
            .indexed_iter()
            .map(|((i, j), d)| {
                d * (self.x_edges[i + 1] - self.x_edges[i]) * (self.y_edges[j + 1] - self.y_edges[j])
            })
            .sum()
    }

    /// Spline surface through the bin centers.
    ///
    /// Its support is the rectangle spanned by the first and last centers.
    /// A single-bin axis is constant over the bin's full edge range instead.
    pub fn surface(&self) -> PlotResult<BicubicSurface> {
        BicubicSurface::new(
            center_axis(&self.x_edges)?,
            center_axis(&self.y_edges)?,
            self.density.clone(),
        )
    }
}

fn axis_edges(values: impl Iterator<Item = f64>, n: usize) -> Array1<f64> {
    let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    // Bins narrower than a few ulps would collapse the bin centers
    let min_span = lo.abs().max(hi.abs()) * n as f64 * 64.0 * f64::EPSILON;
    if lo == hi {
        let half = 0.5f64.max(min_span / 2.0);
        lo -= half;
        hi += half;
    } else if hi - lo < min_span {
        let mid = lo + (hi - lo) / 2.0;
        lo = mid - min_span / 2.0;
        hi = mid + min_span / 2.0;
    }
    // last edge is exactly `hi`
    Array1::from_shape_fn(n + 1, |i| {
        if i == n {
            hi
        } else {
            lo + (hi - lo) * i as f64 / n as f64
        }
    })
}

fn bin_index(value: f64, edges: &Array1<f64>) -> usize {
    let n = edges.len() - 1;
    let lo = edges[0];
    let hi = edges[n];
    if value >= hi {
        return n - 1;
    }
    let idx = ((value - lo) / (hi - lo) * n as f64).floor();
    (idx.max(0.0) as usize).min(n - 1)
}

fn centers(edges: &Array1<f64>) -> Vec<f64> {
    edges
        .iter()
        .zip(edges.iter().skip(1))
        .map(|(lo, hi)| (lo + hi) / 2.0)
        .collect()
}

fn center_axis(edges: &Array1<f64>) -> PlotResult<SplineAxis> {
    let knots = centers(edges);
    if knots.len() == 1 {
        SplineAxis::with_support(knots, (edges[0], edges[1]))
    } else {
        SplineAxis::new(knots)
    }
}

/// Estimate a density for every point and sort ascending by density.
///
/// Fails with `InvalidArgument` when `points` is empty, a bin count is 0 or
/// a coordinate is not finite. Points outside the bin-center grid and
/// negative spline overshoot both get density `0.0`. Equal densities keep
/// their input order.
pub fn estimate_density(points: &[Point], bins: Bins) -> PlotResult<Vec<AnnotatedPoint>> {
    let histogram = Histogram2d::build(points, bins)?;
    let surface = histogram.surface()?;

    let mut outside = 0usize;
    let mut annotated: Vec<AnnotatedPoint> = points
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let density = match surface.evaluate(p.x, p.y) {
                Some(d) if d > 0.0 => d,
                Some(_) => 0.0,
                None => {
                    outside += 1;
                    0.0
                }
            };
            AnnotatedPoint {
                index,
                x: p.x,
                y: p.y,
                density,
            }
        })
        .collect();

    annotated.sort_by(|a, b| a.density.total_cmp(&b.density));

    tracing::debug!(
        "Estimated density for {} points on a {}x{} grid ({} outside the interpolation grid)",
        points.len(),
        bins.x,
        bins.y,
        outside
    );
    Ok(annotated)
}

/// Table form of [`estimate_density`].
///
/// Reads the `x` and `y` columns, appends a `Float64` column named
/// [`DENSITY_COLUMN`] and returns the rows sorted ascending by density. All
/// other columns travel with their rows.
pub fn point_density_table(batch: &RecordBatch, x: &str, y: &str, bins: Bins) -> PlotResult<RecordBatch> {
    bins.validate()?;
    let xs = dense_numeric_values(batch, x)?;
    let ys = dense_numeric_values(batch, y)?;
    let points: Vec<Point> = xs.into_iter().zip(ys).map(Point::from).collect();

    let annotated = estimate_density(&points, bins)?;
    let order: Vec<usize> = annotated.iter().map(|p| p.index).collect();
    let densities: Vec<f64> = annotated.iter().map(|p| p.density).collect();

    let sorted = take_rows(batch, &order)?;
    append_f64_column(&sorted, DENSITY_COLUMN, densities)
}
