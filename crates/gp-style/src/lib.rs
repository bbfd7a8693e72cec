//! Styling helpers: palettes, colormaps and process-wide aesthetics

pub mod aesthetics;
pub mod palette;

pub use aesthetics::{
    current_aesthetics, set_aesthetics, Aesthetics, AxesStyle, PlotContext,
};
pub use palette::{
    discrete_palette, diverging_cmap, sequential_cmap, Colormap, Palette, Rgb,
    DEFAULT_PALETTE,
};
