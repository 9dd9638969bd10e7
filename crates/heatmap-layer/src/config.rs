//! Configuration for a heatmap layer.
//!
//! Values come from, in increasing precedence: built-in defaults, a YAML
//! file, then `HEATMAP_*` environment variables.

use std::path::Path;
use std::str::FromStr;

use heatmap_common::{Color, HeatmapError, HeatmapResult};
use renderer::IntervalType;
use serde::{Deserialize, Serialize};
use spatial_index::IndexMode;
use tracing::info;

use crate::layer::LayerSettings;
use crate::radius::RadiusConfig;

/// Largest native tile edge accepted.
pub const MAX_TILE_SIZE: u32 = 2048;

/// Configuration for a heatmap layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Spatial index strategy, fixed for the layer's lifetime.
    pub index_mode: IndexMode,

    /// Gradient stop placement.
    pub interval: IntervalType,

    /// Color scale, low to high intensity.
    pub scale: Vec<Color>,

    /// Point radius.
    pub radius: RadiusConfig,

    /// Falloff beyond the radius, in pixels.
    pub blur: f64,

    /// Alpha contributed per unit of measure.
    pub intensity_increment: f64,

    /// Native tile edge in pixels.
    pub tile_size: u32,

    /// Render margin per side as a fraction of the tile size.
    pub extension_factor: f64,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            index_mode: IndexMode::Grid,
            interval: IntervalType::Continuous,
            scale: default_scale(),
            radius: RadiusConfig::default(),
            blur: 15.0,
            intensity_increment: 0.1,
            tile_size: 256,
            extension_factor: 1.0,
        }
    }
}

/// Blue → cyan → lime → yellow → red.
pub fn default_scale() -> Vec<Color> {
    vec![
        Color::rgb(0, 0, 255),
        Color::rgb(0, 255, 255),
        Color::rgb(0, 255, 0),
        Color::rgb(255, 255, 0),
        Color::rgb(255, 0, 0),
    ]
}

impl HeatmapConfig {
    /// Parse configuration from YAML. Missing keys take their defaults.
    pub fn from_yaml(yaml: &str) -> HeatmapResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| HeatmapError::Config(e.to_string()))
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> HeatmapResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            HeatmapError::Io(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from environment variables over the defaults.
    pub fn from_env() -> HeatmapResult<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Optional file, then environment overrides, then validation.
    pub fn load(path: Option<&Path>) -> HeatmapResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        info!(
            index_mode = %config.index_mode,
            interval = %config.interval,
            tile_size = config.tile_size,
            "Loaded heatmap configuration"
        );
        Ok(config)
    }

    /// Override fields from `HEATMAP_*` environment variables.
    pub fn apply_env(&mut self) -> HeatmapResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Override fields from any key lookup.
    ///
    /// Present but unparseable values are errors; an unknown index mode must
    /// not silently fall back to the default.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> HeatmapResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("HEATMAP_INDEX_MODE") {
            self.index_mode = val.parse()?;
        }

        if let Some(val) = lookup("HEATMAP_INTERVAL") {
            self.interval = val.parse()?;
        }

        if let Some(val) = lookup("HEATMAP_SCALE") {
            self.scale = val
                .split(',')
                .map(|c| Color::from_str(c.trim()))
                .collect::<Result<_, _>>()?;
        }

        if let Some(val) = lookup("HEATMAP_RADIUS") {
            self.radius = RadiusConfig::parse(&val)?;
        }

        override_number(&lookup, "HEATMAP_BLUR", &mut self.blur)?;
        override_number(&lookup, "HEATMAP_INTENSITY_INCREMENT", &mut self.intensity_increment)?;
        override_number(&lookup, "HEATMAP_TILE_SIZE", &mut self.tile_size)?;
        override_number(&lookup, "HEATMAP_EXTENSION_FACTOR", &mut self.extension_factor)?;

        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> HeatmapResult<()> {
        self.layer_settings().validate()
    }

    /// Render settings for the layer snapshot.
    pub fn layer_settings(&self) -> LayerSettings {
        LayerSettings {
            scale: self.scale.clone(),
            interval: self.interval,
            radius: self.radius,
            blur: self.blur,
            intensity_increment: self.intensity_increment,
            tile_size: self.tile_size,
            extension_factor: self.extension_factor,
        }
    }
}

fn override_number<F, T>(lookup: &F, key: &str, field: &mut T) -> HeatmapResult<()>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(val) = lookup(key) {
        *field = val
            .trim()
            .parse()
            .map_err(|_| HeatmapError::Config(format!("{}: invalid value '{}'", key, val)))?;
    }
    Ok(())
}
