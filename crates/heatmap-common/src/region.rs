//! Geographic query regions.

use serde::{Deserialize, Serialize};

/// Latitude limit of the globe in degrees.
pub const MAX_LATITUDE: f64 = 90.0;
/// Longitude limit of the globe in degrees.
pub const MAX_LONGITUDE: f64 = 180.0;

/// An axis-aligned latitude/longitude box in degrees.
///
/// Latitude bounds are expected within [-90, 90]. Longitude bounds may fall
/// outside [-180, 180] to express a window that crosses the antimeridian, e.g.
/// `min_lon = -225` covers 45 degrees west of the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Region {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// The whole globe.
    pub fn world() -> Self {
        Self::new(-MAX_LATITUDE, MAX_LATITUDE, -MAX_LONGITUDE, MAX_LONGITUDE)
    }

    /// Latitude extent in degrees.
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Longitude extent in degrees.
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Inclusive point-containment test against the raw bounds.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    /// Latitude bounds clamped to the valid range.
    pub fn clamped_lat(&self) -> (f64, f64) {
        (
            self.min_lat.clamp(-MAX_LATITUDE, MAX_LATITUDE),
            self.max_lat.clamp(-MAX_LATITUDE, MAX_LATITUDE),
        )
    }

    /// Longitude bounds clamped to the valid range.
    pub fn clamped_lon(&self) -> (f64, f64) {
        (
            self.min_lon.clamp(-MAX_LONGITUDE, MAX_LONGITUDE),
            self.max_lon.clamp(-MAX_LONGITUDE, MAX_LONGITUDE),
        )
    }

    /// Degrees requested west of -180 (0 when the window does not reach it).
    pub fn wrap_before(&self) -> f64 {
        if self.min_lon <= -MAX_LONGITUDE {
            (self.min_lon + MAX_LONGITUDE).abs()
        } else {
            0.0
        }
    }

    /// Degrees requested east of 180 (0 when the window does not reach it).
    pub fn wrap_after(&self) -> f64 {
        if self.max_lon >= MAX_LONGITUDE {
            self.max_lon - MAX_LONGITUDE
        } else {
            0.0
        }
    }

    /// True when the window extends past either side of the antimeridian.
    pub fn wraps(&self) -> bool {
        self.wrap_before() > 0.0 || self.wrap_after() > 0.0
    }

    /// Grow the region on every side by a fraction of its own span.
    ///
    /// `lat_fraction` and `lon_fraction` are applied per side, so a fraction of
    /// 1.0 triples the extent on that axis.
    pub fn extended(&self, lat_fraction: f64, lon_fraction: f64) -> Region {
        let lat_margin = self.lat_span() * lat_fraction;
        let lon_margin = self.lon_span() * lon_fraction;
        Region::new(
            self.min_lat - lat_margin,
            self.max_lat + lat_margin,
            self.min_lon - lon_margin,
            self.max_lon + lon_margin,
        )
    }

    /// Check the bounds are finite and ordered.
    pub fn is_valid(&self) -> bool {
        [self.min_lat, self.max_lat, self.min_lon, self.max_lon]
            .iter()
            .all(|v| v.is_finite())
            && self.min_lat <= self.max_lat
            && self.min_lon <= self.max_lon
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_amounts() {
        let region = Region::new(-30.0, 30.0, -225.0, -160.0);
        assert_eq!(region.wrap_before(), 45.0);
        assert_eq!(region.wrap_after(), 0.0);
        assert!(region.wraps());

        let region = Region::new(-30.0, 30.0, 170.0, 200.0);
        assert_eq!(region.wrap_before(), 0.0);
        assert_eq!(region.wrap_after(), 20.0);

        let region = Region::new(20.0, 30.0, 150.0, 160.0);
        assert!(!region.wraps());
    }

    #[test]
    fn test_exact_antimeridian_bound_does_not_wrap() {
        let region = Region::world();
        assert_eq!(region.wrap_before(), 0.0);
        assert_eq!(region.wrap_after(), 0.0);
    }
}
