//! Weighted input points.

use serde::{Deserialize, Serialize};

use crate::error::{HeatmapError, HeatmapResult};

/// A geo-located sample with a non-negative weight.
///
/// Latitude and longitude are in degrees. Longitude is not required to lie in
/// [-180, 180); wraparound copies produced by a region query carry longitudes
/// shifted by ±360.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub measure: f64,
}

impl WeightedPoint {
    pub fn new(latitude: f64, longitude: f64, measure: f64) -> Self {
        Self {
            latitude,
            longitude,
            measure,
        }
    }

    /// Copy of this point with its longitude shifted by `delta` degrees.
    pub fn shifted(&self, delta: f64) -> Self {
        Self {
            longitude: self.longitude + delta,
            ..*self
        }
    }

    /// Check that the point can be ingested. `index` is reported in the error.
    pub fn validate(&self, index: usize) -> HeatmapResult<()> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(HeatmapError::invalid_point(
                index,
                format!("non-finite coordinate ({}, {})", self.latitude, self.longitude),
            ));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(HeatmapError::invalid_point(
                index,
                format!("latitude {} outside [-90, 90]", self.latitude),
            ));
        }
        if !self.measure.is_finite() || self.measure < 0.0 {
            return Err(HeatmapError::invalid_point(
                index,
                format!("measure {} must be finite and >= 0", self.measure),
            ));
        }
        Ok(())
    }
}

/// Parse a JSON array of points and validate every entry.
pub fn points_from_json(json: &str) -> HeatmapResult<Vec<WeightedPoint>> {
    let points: Vec<WeightedPoint> = serde_json::from_str(json)?;
    for (index, point) in points.iter().enumerate() {
        point.validate(index)?;
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shifted_keeps_measure() {
        let p = WeightedPoint::new(10.0, 179.9, 4.0);
        let shifted = p.shifted(-360.0);
        assert!((shifted.longitude - (-180.1)).abs() < 1e-9);
        assert_eq!(shifted.latitude, 10.0);
        assert_eq!(shifted.measure, 4.0);
        assert_eq!(p.longitude, 179.9);
    }

    #[test]
    fn test_validate() {
        assert!(WeightedPoint::new(0.0, 0.0, 0.0).validate(0).is_ok());
        assert!(WeightedPoint::new(0.0, 250.0, 1.0).validate(0).is_ok());
        assert!(WeightedPoint::new(91.0, 0.0, 1.0).validate(0).is_err());
        assert!(WeightedPoint::new(0.0, 0.0, -1.0).validate(0).is_err());
        assert!(WeightedPoint::new(f64::NAN, 0.0, 1.0).validate(0).is_err());
    }

    #[test]
    fn test_points_from_json_reports_index() {
        let json = r#"[
            {"latitude": 1.0, "longitude": 2.0, "measure": 3.0},
            {"latitude": 1.0, "longitude": 2.0, "measure": -3.0}
        ]"#;
        match points_from_json(json) {
            Err(HeatmapError::InvalidPoint { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected InvalidPoint, got {:?}", other),
        }
    }
}
