//! Core functionality shared by the plotting recipes
//!
//! This crate provides the error taxonomy, helpers for reading Arrow tables
//! by column name, and the open option map forwarded to renderers.

pub mod error;
pub mod logging;
pub mod options;
pub mod table;

// Re-export commonly used types
pub use error::{PlotError, PlotResult};
pub use options::PlotOptions;
pub use table::{
    append_f64_column, category_values, column_names, dense_numeric_values,
    numeric_values, take_rows,
};
