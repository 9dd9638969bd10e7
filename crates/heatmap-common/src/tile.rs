//! Tile addressing for the WorldCRS84Quad pyramid and extended-tile math.
//!
//! Heatmap tiles use the OGC WorldCRS84Quad layout: a linear lat/lon grid with
//! `2^(z+1)` columns and `2^z` rows, origin at (-180, 90).

use crate::error::{HeatmapError, HeatmapResult};
use crate::region::Region;
use serde::{Deserialize, Serialize};

/// Deepest supported zoom level.
pub const MAX_ZOOM: u32 = 22;

/// A tile coordinate (z/x/y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level (TileMatrix identifier)
    pub z: u32,
    /// Column (x)
    pub x: u32,
    /// Row (y)
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Geographic region covered by this tile.
    ///
    /// Fails when the zoom exceeds [`MAX_ZOOM`] or the column/row lies outside
    /// the tile matrix.
    pub fn region(&self) -> HeatmapResult<Region> {
        if self.z > MAX_ZOOM {
            return Err(HeatmapError::invalid_tile(
                self.z,
                self.x,
                self.y,
                format!("zoom exceeds maximum of {}", MAX_ZOOM),
            ));
        }
        let (cols, rows) = matrix_dimensions(self.z);
        if self.x >= cols || self.y >= rows {
            return Err(HeatmapError::invalid_tile(
                self.z,
                self.x,
                self.y,
                format!("outside {}x{} tile matrix", cols, rows),
            ));
        }
        Ok(wgs84_tile_region(self))
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// Columns and rows of the WorldCRS84Quad matrix at `zoom`.
pub fn matrix_dimensions(zoom: u32) -> (u32, u32) {
    (2u32.pow(zoom + 1), 2u32.pow(zoom))
}

/// Convert WorldCRS84Quad tile coordinates to lat/lon bounds.
///
/// WorldCRS84Quad uses a 2:1 aspect ratio grid:
/// - matrix_width = 2^(z+1) columns
/// - matrix_height = 2^z rows
/// - Linear latitude/longitude mapping (no Mercator projection)
/// - Top-left origin at (-180, 90)
pub fn wgs84_tile_region(coord: &TileCoord) -> Region {
    let (n_cols, n_rows) = matrix_dimensions(coord.z);
    let n_cols = n_cols as f64;
    let n_rows = n_rows as f64;

    let lon_min = (coord.x as f64 / n_cols) * 360.0 - 180.0;
    let lon_max = ((coord.x + 1) as f64 / n_cols) * 360.0 - 180.0;

    // lat decreases as row index increases
    let lat_max = 90.0 - (coord.y as f64 / n_rows) * 180.0;
    let lat_min = 90.0 - ((coord.y + 1) as f64 / n_rows) * 180.0;

    Region::new(lat_min, lat_max, lon_min, lon_max)
}

// =============================================================================
// TileExtension - extended canvas so point footprints cross tile edges
// =============================================================================

/// Configuration for rendering a tile on an extended canvas.
///
/// Points just outside a tile still paint into it through their radius and
/// blur. The tile is therefore rendered with a margin of
/// `ceil(extension_factor * tile_size)` pixels on every side and the centre is
/// cropped afterwards.
///
/// # Example
/// ```
/// use heatmap_common::tile::TileExtension;
///
/// let ext = TileExtension::default();
/// assert_eq!(ext.margin_pixels(), 256);
/// assert_eq!(ext.render_width(), 768);
///
/// let ext = TileExtension::new(0.25, 256);
/// assert_eq!(ext.render_width(), 384);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileExtension {
    /// Margin as a fraction of the tile size, per side
    pub extension_factor: f64,
    /// Base tile size (typically 256)
    pub tile_size: u32,
}

impl Default for TileExtension {
    fn default() -> Self {
        Self {
            extension_factor: 1.0,
            tile_size: 256,
        }
    }
}

impl TileExtension {
    /// A negative or NaN factor means no margin. Layer settings reject such
    /// factors before an extension is ever built from them.
    pub fn new(extension_factor: f64, tile_size: u32) -> Self {
        Self {
            extension_factor: if extension_factor > 0.0 { extension_factor } else { 0.0 },
            tile_size,
        }
    }

    /// No margin.
    pub fn none(tile_size: u32) -> Self {
        Self {
            extension_factor: 0.0,
            tile_size,
        }
    }

    /// Margin in pixels on each side of the tile, saturating at `u32::MAX`.
    pub fn margin_pixels(&self) -> u32 {
        (self.extension_factor * self.tile_size as f64).ceil() as u32
    }

    /// Total render width including the margin on both sides.
    ///
    /// Saturates at `u32::MAX`, which no renderer accepts as a canvas edge.
    pub fn render_width(&self) -> u32 {
        self.margin_pixels()
            .saturating_mul(2)
            .saturating_add(self.tile_size)
    }

    /// Total render height including the margin on both sides.
    pub fn render_height(&self) -> u32 {
        self.render_width()
    }

    /// Extend a tile region to cover the full render canvas.
    ///
    /// The geographic margin is derived from the pixel margin so the canvas
    /// keeps the tile's degrees-per-pixel on both axes.
    pub fn extended_region(&self, tile_region: &Region) -> Region {
        let margin = self.margin_pixels();
        if margin == 0 || self.tile_size == 0 {
            return *tile_region;
        }
        let fraction = margin as f64 / self.tile_size as f64;
        tile_region.extended(fraction, fraction)
    }

    /// Crop the centre tile from an extended RGBA pixel buffer.
    ///
    /// Rows that fall outside `extended_pixels` are left transparent.
    pub fn crop_to_tile(&self, extended_pixels: &[u8]) -> Vec<u8> {
        let margin = self.margin_pixels() as usize;
        let tile_size = self.tile_size as usize;
        if margin == 0 {
            return extended_pixels.to_vec();
        }

        let render_width = self.render_width() as usize;
        let mut result = vec![0u8; tile_size * tile_size * 4];

        for row in 0..tile_size {
            let src_y = margin + row;
            let src_start = (src_y * render_width + margin) * 4;
            let src_end = src_start + tile_size * 4;

            let dst_start = row * tile_size * 4;
            let dst_end = dst_start + tile_size * 4;

            if src_end <= extended_pixels.len() {
                result[dst_start..dst_end].copy_from_slice(&extended_pixels[src_start..src_end]);
            }
        }

        result
    }
}
