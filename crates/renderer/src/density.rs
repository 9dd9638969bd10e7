//! Density rendering of weighted points into RGBA canvases.
//!
//! [`TileRenderer`] is the seam between tile orchestration and pixel
//! production. [`DensityRenderer`] is the default implementation: every point
//! stamps a radial kernel into a single-channel alpha field, and the field is
//! then colorized through the gradient palette.

use heatmap_common::{Region, WeightedPoint};
use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::gradient::GradientTable;

/// Largest canvas a single render may allocate (4096 × 4096).
pub const MAX_CANVAS_PIXELS: u64 = 4096 * 4096;

/// Palette entries used to colorize the alpha field.
pub const PALETTE_SIZE: usize = 256;

/// Everything a renderer needs for one canvas.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    /// Points inside `region`, already wraparound-corrected
    pub points: &'a [WeightedPoint],
    /// Geographic extent of the canvas
    pub region: Region,
    pub width: u32,
    pub height: u32,
    /// Full-strength radius in pixels
    pub radius: f64,
    /// Falloff distance beyond `radius`, in pixels
    pub blur: f64,
    pub gradient: &'a GradientTable,
    /// Alpha contributed per unit of measure
    pub intensity_increment: f64,
}

/// An RGBA8 pixel buffer, row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    /// A fully transparent buffer.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 4],
        }
    }

    /// RGBA value at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels
            .get(offset..offset + 4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// True when every pixel has zero alpha.
    pub fn is_transparent(&self) -> bool {
        self.pixels.chunks_exact(4).all(|p| p[3] == 0)
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Canvas has no pixels ({width}x{height})")]
    EmptyCanvas { width: u32, height: u32 },

    #[error("Canvas {width}x{height} exceeds the {max} pixel limit")]
    CanvasTooLarge { width: u32, height: u32, max: u64 },

    #[error("Invalid render region: {0}")]
    InvalidRegion(String),

    #[error("Invalid render parameter: {0}")]
    InvalidParameter(String),

    #[error("Encoding failed: {0}")]
    Encode(String),
}

impl From<RenderError> for heatmap_common::HeatmapError {
    fn from(err: RenderError) -> Self {
        heatmap_common::HeatmapError::Render(err.to_string())
    }
}

/// Produces a pixel buffer for a render request.
///
/// Implementations must be usable from several threads at once; the tile
/// server renders on the blocking pool.
pub trait TileRenderer: Send + Sync {
    fn render(&self, request: &RenderRequest<'_>) -> Result<PixelBuffer, RenderError>;
}

/// Kernel-density renderer.
///
/// A point at distance `d` pixels contributes full strength when
/// `d <= radius`, falling off linearly to zero at `radius + blur`. The
/// contribution `kernel * measure * intensity_increment` is clamped to [0, 1]
/// and accumulated with source-over compositing, `a += alpha * (1 - a)`, so
/// overlapping points saturate towards 1 without exceeding it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DensityRenderer;

impl DensityRenderer {
    pub fn new() -> Self {
        Self
    }

    fn validate(request: &RenderRequest<'_>) -> Result<(), RenderError> {
        let (width, height) = (request.width, request.height);
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyCanvas { width, height });
        }
        if width as u64 * height as u64 > MAX_CANVAS_PIXELS {
            return Err(RenderError::CanvasTooLarge {
                width,
                height,
                max: MAX_CANVAS_PIXELS,
            });
        }

        let region = &request.region;
        if !region.is_valid() || region.lat_span() <= 0.0 || region.lon_span() <= 0.0 {
            return Err(RenderError::InvalidRegion(format!(
                "lat [{}, {}], lon [{}, {}]",
                region.min_lat, region.max_lat, region.min_lon, region.max_lon
            )));
        }

        for (name, value) in [
            ("radius", request.radius),
            ("blur", request.blur),
            ("intensity_increment", request.intensity_increment),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RenderError::InvalidParameter(format!(
                    "{} must be finite and >= 0, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Accumulate every point's kernel into an alpha field.
    fn accumulate(request: &RenderRequest<'_>) -> Vec<f32> {
        let width = request.width as usize;
        let height = request.height as usize;
        let region = &request.region;

        let x_scale = width as f64 / region.lon_span();
        let y_scale = height as f64 / region.lat_span();
        let reach = request.radius + request.blur;

        let mut field = vec![0f32; width * height];

        for point in request.points {
            let strength = point.measure * request.intensity_increment;
            if strength <= 0.0 {
                continue;
            }

            let px = (point.longitude - region.min_lon) * x_scale;
            let py = (region.max_lat - point.latitude) * y_scale;

            let x0 = (px - reach).floor().max(0.0);
            let x1 = (px + reach).ceil().min(width as f64 - 1.0);
            let y0 = (py - reach).floor().max(0.0);
            let y1 = (py + reach).ceil().min(height as f64 - 1.0);
            if x0 > x1 || y0 > y1 {
                continue;
            }

            for y in y0 as usize..=y1 as usize {
                let dy = y as f64 + 0.5 - py;
                let row = &mut field[y * width..(y + 1) * width];
                for (x, a) in row
                    .iter_mut()
                    .enumerate()
                    .take(x1 as usize + 1)
                    .skip(x0 as usize)
                {
                    let dx = x as f64 + 0.5 - px;
                    let k = kernel((dx * dx + dy * dy).sqrt(), request.radius, request.blur);
                    if k <= 0.0 {
                        continue;
                    }
                    let alpha = (k * strength).clamp(0.0, 1.0) as f32;
                    *a += alpha * (1.0 - *a);
                }
            }
        }

        field
    }
}

impl TileRenderer for DensityRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<PixelBuffer, RenderError> {
        Self::validate(request)?;

        let field = Self::accumulate(request);
        let palette = request.gradient.palette(PALETTE_SIZE);
        let width = request.width as usize;

        let mut pixels = vec![0u8; field.len() * 4];
        pixels
            .par_chunks_mut(width * 4)
            .zip(field.par_chunks(width))
            .for_each(|(out_row, alpha_row)| {
                for (out, &a) in out_row.chunks_exact_mut(4).zip(alpha_row) {
                    if a <= 0.0 {
                        continue;
                    }
                    let level = (a.clamp(0.0, 1.0) * 255.0).round() as usize;
                    let color = palette[level.min(PALETTE_SIZE - 1)];
                    out[0] = color.r;
                    out[1] = color.g;
                    out[2] = color.b;
                    out[3] = ((a.clamp(0.0, 1.0) * color.a as f32).round()) as u8;
                }
            });

        debug!(
            width = request.width,
            height = request.height,
            points = request.points.len(),
            "Rendered density canvas"
        );

        Ok(PixelBuffer {
            width: request.width,
            height: request.height,
            pixels,
        })
    }
}

/// Kernel weight at distance `d`: 1 inside `radius`, linear to 0 at
/// `radius + blur`.
#[inline]
pub fn kernel(d: f64, radius: f64, blur: f64) -> f64 {
    if d <= radius {
        1.0
    } else if blur > 0.0 && d < radius + blur {
        1.0 - (d - radius) / blur
    } else {
        0.0
    }
}
