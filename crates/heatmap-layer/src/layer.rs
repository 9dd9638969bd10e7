//! Layer state shared by concurrent tile renders.
//!
//! A [`HeatmapLayer`] owns the spatial index, built once, and the current
//! [`LayerSnapshot`]. Renders take an `Arc` to the snapshot at the start and
//! work on it to the end. [`HeatmapLayer::configure`] builds a complete
//! replacement and swaps it in, so a render sees either the old settings or
//! the new ones, never a mix.

use std::sync::{Arc, RwLock};

use heatmap_common::{Color, HeatmapError, HeatmapResult, TileExtension, WeightedPoint};
use renderer::{GradientBuilder, GradientTable, IntervalType, MAX_CANVAS_PIXELS};
use serde::{Deserialize, Serialize};
use spatial_index::{IndexMode, SpatialIndex};
use tracing::info;

use crate::config::{HeatmapConfig, MAX_TILE_SIZE};
use crate::radius::{RadiusConfig, RadiusPolicy};

/// Everything about a layer that can change after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSettings {
    pub scale: Vec<Color>,
    pub interval: IntervalType,
    pub radius: RadiusConfig,
    pub blur: f64,
    pub intensity_increment: f64,
    pub tile_size: u32,
    pub extension_factor: f64,
}

impl Default for LayerSettings {
    fn default() -> Self {
        HeatmapConfig::default().layer_settings()
    }
}

impl LayerSettings {
    pub fn extension(&self) -> TileExtension {
        TileExtension::new(self.extension_factor, self.tile_size)
    }

    pub fn validate(&self) -> HeatmapResult<()> {
        if self.scale.is_empty() {
            return Err(HeatmapError::InvalidScale(
                "scale must contain at least one color".to_string(),
            ));
        }
        self.radius.validate()?;
        if !self.blur.is_finite() || self.blur < 0.0 {
            return Err(HeatmapError::Config(format!("invalid blur {}", self.blur)));
        }
        if !self.intensity_increment.is_finite() || self.intensity_increment <= 0.0 {
            return Err(HeatmapError::Config(format!(
                "invalid intensity_increment {}",
                self.intensity_increment
            )));
        }
        if self.tile_size == 0 || self.tile_size > MAX_TILE_SIZE {
            return Err(HeatmapError::Config(format!(
                "invalid tile_size {}",
                self.tile_size
            )));
        }
        if !self.extension_factor.is_finite() || self.extension_factor < 0.0 {
            return Err(HeatmapError::Config(format!(
                "invalid extension_factor {}",
                self.extension_factor
            )));
        }

        let canvas = self.extension().render_width() as u64;
        if canvas * canvas > MAX_CANVAS_PIXELS {
            return Err(HeatmapError::Config(format!(
                "tile_size {} with extension_factor {} needs a {}px canvas, above the render limit",
                self.tile_size, self.extension_factor, canvas
            )));
        }
        Ok(())
    }
}

/// An immutable view of the layer used for one or more renders.
pub struct LayerSnapshot {
    pub index: Arc<SpatialIndex>,
    pub gradient: Arc<GradientTable>,
    pub settings: LayerSettings,
    pub radius: Arc<dyn RadiusPolicy>,
    /// Incremented on every successful configure.
    pub generation: u64,
}

impl std::fmt::Debug for LayerSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerSnapshot")
            .field("points", &self.index.len())
            .field("stops", &self.gradient.len())
            .field("settings", &self.settings)
            .field("generation", &self.generation)
            .finish()
    }
}

pub struct HeatmapLayer {
    index: Arc<SpatialIndex>,
    current: RwLock<Arc<LayerSnapshot>>,
}

impl HeatmapLayer {
    /// Build the index and the first snapshot.
    ///
    /// Every point is validated first; the index is never built from a
    /// partially valid set.
    pub fn new(
        points: Vec<WeightedPoint>,
        mode: IndexMode,
        settings: LayerSettings,
    ) -> HeatmapResult<Self> {
        for (i, point) in points.iter().enumerate() {
            point.validate(i)?;
        }

        let index = Arc::new(SpatialIndex::build(points, mode));
        let radius = settings.radius.policy();
        let snapshot = build_snapshot(&index, settings, radius, 0)?;

        Ok(Self {
            index,
            current: RwLock::new(Arc::new(snapshot)),
        })
    }

    pub fn from_config(points: Vec<WeightedPoint>, config: &HeatmapConfig) -> HeatmapResult<Self> {
        config.validate()?;
        Self::new(points, config.index_mode, config.layer_settings())
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<LayerSnapshot> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn index(&self) -> &Arc<SpatialIndex> {
        &self.index
    }

    /// Apply new settings, using the radius policy they describe.
    pub fn configure(&self, settings: LayerSettings) -> HeatmapResult<Arc<LayerSnapshot>> {
        let radius = settings.radius.policy();
        self.configure_with_policy(settings, radius)
    }

    /// Apply new settings with a custom radius policy.
    ///
    /// On error the current snapshot stays in place.
    pub fn configure_with_policy(
        &self,
        settings: LayerSettings,
        radius: Arc<dyn RadiusPolicy>,
    ) -> HeatmapResult<Arc<LayerSnapshot>> {
        let mut snapshot = build_snapshot(&self.index, settings, radius, 0)?;

        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        snapshot.generation = guard.generation + 1;
        let snapshot = Arc::new(snapshot);
        *guard = Arc::clone(&snapshot);
        drop(guard);

        info!(
            generation = snapshot.generation,
            interval = %snapshot.settings.interval,
            stops = snapshot.gradient.len(),
            "Swapped layer snapshot"
        );
        Ok(snapshot)
    }
}

fn build_snapshot(
    index: &Arc<SpatialIndex>,
    settings: LayerSettings,
    radius: Arc<dyn RadiusPolicy>,
    generation: u64,
) -> HeatmapResult<LayerSnapshot> {
    settings.validate()?;

    let gradient = match settings.interval {
        IntervalType::Continuous => GradientBuilder::build(&settings.scale, settings.interval, None)?,
        IntervalType::Quantiles => {
            let points: Vec<WeightedPoint> = index.points().copied().collect();
            GradientBuilder::build(&settings.scale, settings.interval, Some(&points))?
        }
    };

    Ok(LayerSnapshot {
        index: Arc::clone(index),
        gradient: Arc::new(gradient),
        settings,
        radius,
        generation,
    })
}
