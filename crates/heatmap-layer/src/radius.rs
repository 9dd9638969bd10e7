//! Point radius policies.
//!
//! The orchestrator asks the layer's policy for a radius, in pixels, once per
//! tile with the tile's region and native pixel size.

use heatmap_common::{HeatmapError, HeatmapResult, Region};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Radius in pixels for a tile covering `region` at `width` × `height`.
pub trait RadiusPolicy: Send + Sync {
    fn radius(&self, region: &Region, width: u32, height: u32) -> f64;
}

/// The same pixel radius at every zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRadius(pub f64);

impl RadiusPolicy for FixedRadius {
    fn radius(&self, _region: &Region, _width: u32, _height: u32) -> f64 {
        self.0
    }
}

/// A radius fixed in geographic degrees, so point footprints grow with zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeographicRadius {
    pub degrees: f64,
}

impl RadiusPolicy for GeographicRadius {
    fn radius(&self, region: &Region, width: u32, _height: u32) -> f64 {
        let span = region.lon_span();
        if span <= 0.0 {
            return 0.0;
        }
        self.degrees * width as f64 / span
    }
}

impl<F> RadiusPolicy for F
where
    F: Fn(&Region, u32, u32) -> f64 + Send + Sync,
{
    fn radius(&self, region: &Region, width: u32, height: u32) -> f64 {
        self(region, width, height)
    }
}

/// Serializable radius setting.
///
/// ```yaml
/// radius:
///   type: fixed
///   pixels: 25
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RadiusConfig {
    Fixed { pixels: f64 },
    Degrees { degrees: f64 },
}

impl Default for RadiusConfig {
    fn default() -> Self {
        RadiusConfig::Fixed { pixels: 25.0 }
    }
}

impl RadiusConfig {
    pub fn policy(&self) -> Arc<dyn RadiusPolicy> {
        match *self {
            RadiusConfig::Fixed { pixels } => Arc::new(FixedRadius(pixels)),
            RadiusConfig::Degrees { degrees } => Arc::new(GeographicRadius { degrees }),
        }
    }

    pub fn validate(&self) -> HeatmapResult<()> {
        let (name, value) = match *self {
            RadiusConfig::Fixed { pixels } => ("pixels", pixels),
            RadiusConfig::Degrees { degrees } => ("degrees", degrees),
        };
        if !value.is_finite() || value < 0.0 {
            return Err(HeatmapError::Config(format!(
                "radius {} must be finite and >= 0, got {}",
                name, value
            )));
        }
        Ok(())
    }

    /// Parse a radius from text: `25` is pixels, `0.5deg` is degrees.
    pub fn parse(s: &str) -> HeatmapResult<Self> {
        let s = s.trim();
        let invalid = || HeatmapError::Config(format!("invalid radius '{}'", s));
        let config = match s.strip_suffix("deg") {
            Some(deg) => RadiusConfig::Degrees {
                degrees: deg.trim().parse().map_err(|_| invalid())?,
            },
            None => RadiusConfig::Fixed {
                pixels: s.trim_end_matches("px").trim().parse().map_err(|_| invalid())?,
            },
        };
        config.validate()?;
        Ok(config)
    }
}
