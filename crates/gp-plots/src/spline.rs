//! Bicubic interpolation over a rectangular grid
//!
//! The surface is the tensor product of two 1-D interpolating cubic splines
//! with not-a-knot end conditions. An interpolating spline is linear in the
//! sampled values, so each axis precomputes the operator mapping values to
//! curvature coefficients and evaluation reduces to a pair of weight vectors:
//!
//!   S(x, y) = wx(x)ᵀ · Z · wy(y)
//!
//! Axes with fewer than four knots drop to the highest degree they support
//! (quadratic, linear, constant). Queries outside an axis' support return
//! `None`.

use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

use gp_core::{PlotError, PlotResult};

/// One axis of the interpolation grid
#[derive(Debug, Clone)]
pub struct SplineAxis {
    knots: Vec<f64>,
    support: (f64, f64),
    /// Maps knot values to the quadratic coefficients `c_i = S''(x_i) / 2`
    curvature: DMatrix<f64>,
}

impl SplineAxis {
    /// Axis whose support spans its first to last knot
    pub fn new(knots: Vec<f64>) -> PlotResult<Self> {
        let support = match (knots.first(), knots.last()) {
            (Some(&lo), Some(&hi)) => (lo, hi),
            _ => return Err(PlotError::invalid("spline axis needs at least one knot")),
        };
        Self::with_support(knots, support)
    }

    /// Axis with an explicit support interval.
    ///
    /// The interval must contain every knot. A single-knot axis is constant
    /// over its whole support.
    pub fn with_support(knots: Vec<f64>, support: (f64, f64)) -> PlotResult<Self> {
        if knots.is_empty() {
            return Err(PlotError::invalid("spline axis needs at least one knot"));
        }
        if knots.iter().any(|k| !k.is_finite()) {
            return Err(PlotError::invalid("spline knots must be finite"));
        }
        if knots.windows(2).any(|w| w[1] <= w[0]) {
            return Err(PlotError::invalid("spline knots must be strictly increasing"));
        }
        let (lo, hi) = support;
        if !(lo <= knots[0] && hi >= knots[knots.len() - 1]) {
            return Err(PlotError::invalid(format!(
                "support [{}, {}] does not contain the knots",
                lo, hi
            )));
        }

        let curvature = curvature_operator(&knots)?;
        Ok(Self {
            knots,
            support,
            curvature,
        })
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn support(&self) -> (f64, f64) {
        self.support
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.support.0 && t <= self.support.1
    }

    /// Weights `w` such that the spline through values `v` at `t` is `w · v`
    pub fn weights(&self, t: f64) -> Option<Array1<f64>> {
        if !self.contains(t) {
            return None;
        }

        let n = self.knots.len();
        let mut w = Array1::<f64>::zeros(n);
        if n == 1 {
            w[0] = 1.0;
            return Some(w);
        }

        let i = self
            .knots
            .partition_point(|&k| k <= t)
            .saturating_sub(1)
            .min(n - 2);
        let h = self.knots[i + 1] - self.knots[i];
        let dt = t - self.knots[i];

        // S(t) = a_i + b_i dt + c_i dt² + d_i dt³ with
        //   b_i = (y_{i+1} - y_i) / h - h (2 c_i + c_{i+1}) / 3
        //   d_i = (c_{i+1} - c_i) / (3 h)
        w[i] += 1.0 - dt / h;
        w[i + 1] += dt / h;

        let dt2 = dt * dt;
        let dt3 = dt2 * dt;
        let alpha = -2.0 * dt * h / 3.0 + dt2 - dt3 / (3.0 * h);
        let beta = -dt * h / 3.0 + dt3 / (3.0 * h);
        for j in 0..n {
            w[j] += alpha * self.curvature[(i, j)] + beta * self.curvature[(i + 1, j)];
        }
        Some(w)
    }

    /// Evaluate the spline through `values` at `t`
    pub fn interpolate(&self, values: &[f64], t: f64) -> Option<f64> {
        if values.len() != self.knots.len() {
            return None;
        }
        let w = self.weights(t)?;
        Some(w.iter().zip(values).map(|(a, b)| a * b).sum())
    }
}

/// Solve `A c = B y` symbolically for `c`, returning `A⁻¹ B`
fn curvature_operator(knots: &[f64]) -> PlotResult<DMatrix<f64>> {
    let n = knots.len();
    if n < 3 {
        // constant or linear: no curvature
        return Ok(DMatrix::zeros(n, n));
    }

    let h: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();
    let mut a = DMatrix::<f64>::zeros(n, n);
    let mut b = DMatrix::<f64>::zeros(n, n);

    for i in 1..n - 1 {
        a[(i, i - 1)] = h[i - 1];
        a[(i, i)] = 2.0 * (h[i - 1] + h[i]);
        a[(i, i + 1)] = h[i];
        b[(i, i - 1)] = 3.0 / h[i - 1];
        b[(i, i)] = -3.0 / h[i] - 3.0 / h[i - 1];
        b[(i, i + 1)] = 3.0 / h[i];
    }

    if n == 3 {
        // A single parabola: constant curvature
        a[(0, 0)] = 1.0;
        a[(0, 1)] = -1.0;
        a[(2, 1)] = -1.0;
        a[(2, 2)] = 1.0;
    } else {
        // Not-a-knot: the third derivative is continuous at the second and
        // second-to-last knots
        a[(0, 0)] = h[1];
        a[(0, 1)] = -(h[0] + h[1]);
        a[(0, 2)] = h[0];
        a[(n - 1, n - 3)] = h[n - 2];
        a[(n - 1, n - 2)] = -(h[n - 3] + h[n - 2]);
        a[(n - 1, n - 1)] = h[n - 3];
    }

    a.lu()
        .solve(&b)
        .ok_or_else(|| PlotError::Numerical("singular spline system".to_string()))
}

/// Tensor-product spline surface over a rectangular grid
#[derive(Debug, Clone)]
pub struct BicubicSurface {
    x_axis: SplineAxis,
    y_axis: SplineAxis,
    /// `values[[i, j]]` is the sample at `(x_knots[i], y_knots[j])`
    values: Array2<f64>,
}

impl BicubicSurface {
    pub fn new(x_axis: SplineAxis, y_axis: SplineAxis, values: Array2<f64>) -> PlotResult<Self> {
        let expected = (x_axis.knots().len(), y_axis.knots().len());
        if values.dim() != expected {
            return Err(PlotError::invalid(format!(
                "grid values have shape {:?}, expected {:?}",
                values.dim(),
                expected
            )));
        }
        Ok(Self {
            x_axis,
            y_axis,
            values,
        })
    }

    pub fn x_axis(&self) -> &SplineAxis {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &SplineAxis {
        &self.y_axis
    }

    /// Evaluate at `(x, y)`; `None` outside the grid support
    pub fn evaluate(&self, x: f64, y: f64) -> Option<f64> {
        let wx = self.x_axis.weights(x)?;
        let wy = self.y_axis.weights(y)?;
        Some(wx.dot(&self.values.dot(&wy)))
    }
}
