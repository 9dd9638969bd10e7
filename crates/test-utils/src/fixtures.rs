//! Common test fixtures for heatmap tests.
//!
//! Pre-defined regions and color scales covering the usual query shapes:
//! global, regional, tile-sized and antimeridian-crossing.

use heatmap_common::{Color, Region};

/// Common query regions for testing.
pub mod regions {
    use super::Region;

    /// The whole globe.
    pub fn global() -> Region {
        Region::world()
    }

    /// Continental United States
    pub fn conus() -> Region {
        Region::new(20.0, 55.0, -130.0, -60.0)
    }

    /// Europe
    pub fn europe() -> Region {
        Region::new(35.0, 72.0, -15.0, 45.0)
    }

    /// A small region (about one zoom 8 tile)
    pub fn small_tile() -> Region {
        Region::new(40.0, 40.703125, -100.0, -99.296875)
    }

    /// 45 degrees west of the antimeridian, expressed below -180.
    pub fn pacific_west_wrap() -> Region {
        Region::new(-30.0, 30.0, -225.0, -160.0)
    }

    /// 40 degrees east of the antimeridian, expressed above 180.
    pub fn pacific_east_wrap() -> Region {
        Region::new(-30.0, 30.0, 150.0, 220.0)
    }

    /// Regions that never touch ±180, for GRID/ARRAY equivalence checks.
    pub fn non_wrapping() -> Vec<Region> {
        vec![
            Region::new(-89.5, 89.5, -179.5, 179.5),
            conus(),
            europe(),
            small_tile(),
            Region::new(20.0, 30.0, 150.0, 160.0),
            Region::new(-0.5, 0.5, -0.5, 0.5),
            Region::new(-95.0, -60.0, -20.0, 20.0),
        ]
    }
}

/// Common color scales for gradient tests.
pub mod scales {
    use super::Color;

    /// Classic blue → red heat ramp (5 stops).
    pub fn heat() -> Vec<Color> {
        vec![
            Color::rgb(0, 0, 255),
            Color::rgb(0, 255, 255),
            Color::rgb(0, 255, 0),
            Color::rgb(255, 255, 0),
            Color::rgb(255, 0, 0),
        ]
    }

    /// Two-stop black → white ramp.
    pub fn grayscale() -> Vec<Color> {
        vec![Color::rgb(0, 0, 0), Color::rgb(255, 255, 255)]
    }

    /// Single-color scale.
    pub fn single() -> Vec<Color> {
        vec![Color::rgb(255, 0, 0)]
    }
}
