//! Heatmap layers: configuration, atomically swapped render snapshots and the
//! per-tile orchestration that ties the spatial index to a renderer.

pub mod config;
pub mod layer;
pub mod orchestrator;
pub mod radius;

pub use config::{default_scale, HeatmapConfig, MAX_TILE_SIZE};
pub use layer::{HeatmapLayer, LayerSettings, LayerSnapshot};
pub use orchestrator::{RenderedTile, TileOrchestrator};
pub use radius::{FixedRadius, GeographicRadius, RadiusConfig, RadiusPolicy};
