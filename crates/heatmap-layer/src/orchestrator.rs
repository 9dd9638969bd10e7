//! Per-tile render pipeline.
//!
//! For a tile coordinate the orchestrator resolves the tile region, widens it
//! by the configured margin, queries the spatial index with the wider region,
//! hands the points to a [`TileRenderer`] on the extended canvas and crops the
//! centre back to the native tile size.

use std::sync::Arc;
use std::time::Instant;

use heatmap_common::{HeatmapError, HeatmapResult, TileCoord};
use metrics::{counter, histogram};
use renderer::{png, DensityRenderer, RenderRequest, TileRenderer};
use tracing::{debug, instrument, warn};

use crate::layer::{HeatmapLayer, LayerSnapshot};

/// One rendered tile at its native size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTile {
    pub coord: TileCoord,
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major
    pub pixels: Vec<u8>,
    /// Points that fell inside the extended region
    pub point_count: usize,
}

impl RenderedTile {
    /// Encode as PNG, indexed when the tile has few enough colors.
    pub fn encode_png(&self) -> HeatmapResult<Vec<u8>> {
        let png = png::create_png_auto(&self.pixels, self.width as usize, self.height as usize)?;
        Ok(png)
    }
}

pub struct TileOrchestrator<R = DensityRenderer> {
    layer: Arc<HeatmapLayer>,
    renderer: R,
}

impl TileOrchestrator<DensityRenderer> {
    /// An orchestrator using the kernel-density renderer.
    pub fn with_density_renderer(layer: Arc<HeatmapLayer>) -> Self {
        Self::new(layer, DensityRenderer::new())
    }
}

impl<R: TileRenderer> TileOrchestrator<R> {
    pub fn new(layer: Arc<HeatmapLayer>, renderer: R) -> Self {
        Self { layer, renderer }
    }

    pub fn layer(&self) -> &Arc<HeatmapLayer> {
        &self.layer
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Render a tile against the layer's current snapshot.
    pub fn render_tile(&self, coord: &TileCoord) -> HeatmapResult<RenderedTile> {
        let snapshot = self.layer.snapshot();
        self.render_with(&snapshot, coord)
    }

    /// Render a tile against a specific snapshot.
    ///
    /// A failure affects this tile only. Nothing is retried and the layer is
    /// not modified.
    #[instrument(level = "debug", skip(self, snapshot), fields(tile = %coord, generation = snapshot.generation))]
    pub fn render_with(
        &self,
        snapshot: &LayerSnapshot,
        coord: &TileCoord,
    ) -> HeatmapResult<RenderedTile> {
        let start = Instant::now();
        let result = self.render_inner(snapshot, coord);

        match &result {
            Ok(tile) => {
                counter!("heatmap_tiles_rendered_total").increment(1);
                histogram!("heatmap_tile_points").record(tile.point_count as f64);
                histogram!("heatmap_tile_render_duration_seconds")
                    .record(start.elapsed().as_secs_f64());
                debug!(
                    points = tile.point_count,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Rendered tile"
                );
            }
            Err(e) => {
                counter!("heatmap_tile_failures_total").increment(1);
                warn!(error = %e, "Tile render failed");
            }
        }

        result
    }

    fn render_inner(
        &self,
        snapshot: &LayerSnapshot,
        coord: &TileCoord,
    ) -> HeatmapResult<RenderedTile> {
        let settings = &snapshot.settings;
        let tile_size = settings.tile_size;
        let extension = settings.extension();

        let tile_region = coord.region()?;
        let extended = extension.extended_region(&tile_region);
        let radius = snapshot.radius.radius(&tile_region, tile_size, tile_size);

        let points = snapshot.index.query(&extended);

        let request = RenderRequest {
            points: &points,
            region: extended,
            width: extension.render_width(),
            height: extension.render_height(),
            radius,
            blur: settings.blur,
            gradient: &snapshot.gradient,
            intensity_increment: settings.intensity_increment,
        };

        let buffer = self.renderer.render(&request)?;

        if buffer.width != request.width
            || buffer.height != request.height
            || buffer.pixels.len() != request.width as usize * request.height as usize * 4
        {
            return Err(HeatmapError::Render(format!(
                "renderer returned {}x{} ({} bytes), expected {}x{}",
                buffer.width,
                buffer.height,
                buffer.pixels.len(),
                request.width,
                request.height
            )));
        }

        Ok(RenderedTile {
            coord: *coord,
            width: tile_size,
            height: tile_size,
            pixels: extension.crop_to_tile(&buffer.pixels),
            point_count: points.len(),
        })
    }
}
