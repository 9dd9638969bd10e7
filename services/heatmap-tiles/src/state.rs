//! Application state and shared resources.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use heatmap_common::WeightedPoint;
use heatmap_layer::{HeatmapConfig, HeatmapLayer, TileOrchestrator};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::Mutex;
use tracing::info;

use crate::points::load_points;

/// Shared application state.
pub struct AppState {
    pub config: HeatmapConfig,
    pub layer: Arc<HeatmapLayer>,
    pub orchestrator: TileOrchestrator,
    /// Serializes style updates so concurrent PUTs never drop each other's
    /// fields. Tile renders do not take this lock.
    pub style_lock: Mutex<()>,
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Build the layer from an in-memory point set.
    pub fn new(
        config: HeatmapConfig,
        points: Vec<WeightedPoint>,
        prometheus: Option<PrometheusHandle>,
    ) -> Result<Self> {
        let layer = Arc::new(
            HeatmapLayer::from_config(points, &config).context("Failed to build heatmap layer")?,
        );
        let orchestrator = TileOrchestrator::with_density_renderer(Arc::clone(&layer));

        info!(
            points = layer.index().len(),
            index_mode = %config.index_mode,
            interval = %config.interval,
            "Heatmap layer ready"
        );

        Ok(Self {
            config,
            layer,
            orchestrator,
            style_lock: Mutex::new(()),
            prometheus,
        })
    }

    /// Load points from a JSON file and build the layer.
    pub fn load(
        config: HeatmapConfig,
        points_path: &Path,
        prometheus: Option<PrometheusHandle>,
    ) -> Result<Self> {
        let points = load_points(points_path)
            .with_context(|| format!("Failed to load points from {}", points_path.display()))?;
        Self::new(config, points, prometheus)
    }
}
