//! Tile rendering for heatmap layers.
//!
//! - [`gradient`]: color stops for continuous and quantile intervals
//! - [`density`]: the renderer seam and the default kernel-density renderer
//! - [`png`]: PNG encoding of rendered tiles

pub mod density;
pub mod gradient;
pub mod png;

pub use density::{
    DensityRenderer, PixelBuffer, RenderError, RenderRequest, TileRenderer, MAX_CANVAS_PIXELS,
};
pub use gradient::{GradientBuilder, GradientStop, GradientTable, IntervalType};
