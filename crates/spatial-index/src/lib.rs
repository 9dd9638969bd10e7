//! Spatial index for weighted geographic points.
//!
//! Two interchangeable storage strategies answer the same region queries:
//!
//! - [`IndexMode::Grid`]: a dense 181×361 one-degree table. Queries visit only
//!   the cells overlapping the region, so they suit large point sets and small
//!   regions (deep zoom).
//! - [`IndexMode::Array`]: the point list as given. Queries scan everything,
//!   which is cheaper for small point sets or near-global regions.
//!
//! Both strategies handle regions whose longitude bounds cross ±180 by
//! re-emitting points from the far side of the antimeridian with their
//! longitude shifted by ∓360, and return points sorted by (latitude,
//! longitude) so repeated renders are identical.
//!
//! # Example
//!
//! ```
//! use heatmap_common::{Region, WeightedPoint};
//! use spatial_index::{IndexMode, SpatialIndex};
//!
//! let index = SpatialIndex::build(
//!     vec![WeightedPoint::new(0.0, 179.5, 1.0), WeightedPoint::new(0.0, -179.5, 1.0)],
//!     IndexMode::Grid,
//! );
//!
//! // A window reaching 10 degrees west of the antimeridian
//! let hits = index.query(&Region::new(-1.0, 1.0, -190.0, -170.0));
//! let lons: Vec<f64> = hits.iter().map(|p| p.longitude).collect();
//! assert_eq!(lons, vec![-180.5, -179.5]);
//! ```

pub mod flat;
pub mod grid;
pub mod mode;
pub mod query;

pub use flat::FlatIndex;
pub use grid::GridIndex;
pub use mode::IndexMode;
pub use query::{compare_points, sort_points, PointStore};

use heatmap_common::{Region, WeightedPoint};
use tracing::{debug, info};

/// A read-only point index built once from the full point set.
#[derive(Debug, Clone)]
pub enum SpatialIndex {
    Grid(GridIndex),
    Array(FlatIndex),
}

impl SpatialIndex {
    /// Build an index with the given strategy.
    pub fn build(points: Vec<WeightedPoint>, mode: IndexMode) -> Self {
        let count = points.len();
        match mode {
            IndexMode::Grid => {
                let grid = GridIndex::build(points);
                info!(
                    mode = %mode,
                    points = count,
                    occupied_cells = grid.occupied_cells(),
                    "Built spatial index"
                );
                SpatialIndex::Grid(grid)
            }
            IndexMode::Array => {
                info!(mode = %mode, points = count, "Built spatial index");
                SpatialIndex::Array(FlatIndex::build(points))
            }
        }
    }

    pub fn mode(&self) -> IndexMode {
        match self {
            SpatialIndex::Grid(_) => IndexMode::Grid,
            SpatialIndex::Array(_) => IndexMode::Array,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SpatialIndex::Grid(g) => g.len(),
            SpatialIndex::Array(a) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored points, in storage order.
    pub fn points(&self) -> Box<dyn Iterator<Item = &WeightedPoint> + '_> {
        match self {
            SpatialIndex::Grid(g) => Box::new(g.iter()),
            SpatialIndex::Array(a) => Box::new(a.as_slice().iter()),
        }
    }

    /// Points inside `region`, including antimeridian wraparound copies,
    /// sorted by (latitude, longitude).
    pub fn query(&self, region: &Region) -> Vec<WeightedPoint> {
        let result = match self {
            SpatialIndex::Grid(g) => query::wrapped_query(g, region),
            SpatialIndex::Array(a) => query::wrapped_query(a, region),
        };
        debug!(
            mode = %self.mode(),
            min_lat = region.min_lat,
            max_lat = region.max_lat,
            min_lon = region.min_lon,
            max_lon = region.max_lon,
            hits = result.len(),
            "Region query"
        );
        result
    }
}
