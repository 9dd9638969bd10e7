//! Common types and utilities shared across the heatmap tile crates.

pub mod color;
pub mod error;
pub mod point;
pub mod region;
pub mod tile;

pub use color::{Color, ColorParseError};
pub use error::{HeatmapError, HeatmapResult};
pub use point::{points_from_json, WeightedPoint};
pub use region::Region;
pub use tile::{TileCoord, TileExtension};
