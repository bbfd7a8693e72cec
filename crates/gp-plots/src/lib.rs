//! Statistical chart recipes
//!
//! Every recipe takes an Arrow [`RecordBatch`](arrow::record_batch::RecordBatch)
//! and column names, computes what the chart needs, hands a [`PlotSpec`] to a
//! [`PlotRenderer`] and returns the same spec to the caller.
//!
//! The numerical core is [`estimate_density`]: a normalized 2-D histogram,
//! a bicubic spline through the bin centers, evaluated back at every point.

pub mod bar;
pub mod box_plot;
pub mod correlation;
pub mod density;
pub mod grouping;
pub mod kde;
pub mod render;
pub mod ridge;
pub mod rug;
pub mod scatter;
pub mod spline;
pub mod stats;

pub use bar::{stacked_barplot, BarConfig, BarSeries, StackedBarSpec};
pub use box_plot::{annotated_boxplot, BoxGroup, BoxPlotConfig, BoxPlotSpec};
pub use correlation::{
    add_correlation, calculate_correlation, correlation, AnnotationLoc, Correlation,
    CorrelationAnnotationConfig, CorrelationMethod, TextAnnotation,
};
pub use density::{
    estimate_density, point_density_table, AnnotatedPoint, Bins, Histogram2d, Point, DENSITY_COLUMN,
};
pub use kde::{gaussian_kde, KdeCurve, KdeSettings};
pub use render::{PlotRenderer, PlotSpec, RecordingRenderer};
pub use ridge::{ridgeplot, RidgeConfig, RidgeRow, RidgeSpec};
pub use rug::{density_rugplot, DensityRugConfig, DensityRugSpec, DensityTrace, RugTrace};
pub use scatter::{point_density_plot, DensityScatterConfig, MarkerShape, ScatterSpec};
pub use spline::{BicubicSurface, SplineAxis};
pub use stats::BoxStats;

// Re-export the shared core so callers need a single dependency
pub use gp_core::{PlotError, PlotOptions, PlotResult};
