//! Point set generators for index and gradient tests.
//!
//! These generators create predictable, verifiable point patterns that can be
//! used across the test suite.

use heatmap_common::WeightedPoint;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Longitudes of the antimeridian reference set, west to east across 180.
pub const ANTIMERIDIAN_LONGITUDES: [f64; 17] = [
    135.0, 140.0, 145.0, 150.0, 155.0, 160.0, 165.0, 170.0, 175.0, 179.9, -179.9, -175.0, -170.0,
    -165.0, -160.0, -155.0, -150.0,
];

/// Reference points running diagonally across the antimeridian.
///
/// Point `i` sits at longitude `ANTIMERIDIAN_LONGITUDES[i]` and latitude
/// `45 - 5i`, so latitude steps down by 5 degrees per point: 135°E is at 45°N
/// and 150°W at 35°S. Measures are `i + 1`.
///
/// Known answers:
/// - region (-30, 30, -225, -160) → 12 points, longitudes -210 … -160
/// - region (20, 30, 150, 160) → 3 points, no wraparound
///
/// # Example
///
/// ```
/// use test_utils::antimeridian_points;
///
/// let points = antimeridian_points();
/// assert_eq!(points.len(), 17);
/// assert_eq!(points[0].latitude, 45.0);
/// assert_eq!(points[9].longitude, 179.9);
/// ```
pub fn antimeridian_points() -> Vec<WeightedPoint> {
    ANTIMERIDIAN_LONGITUDES
        .iter()
        .enumerate()
        .map(|(i, &lon)| WeightedPoint::new(45.0 - 5.0 * i as f64, lon, (i + 1) as f64))
        .collect()
}

/// Longitudes expected from the west-wrap query over [`antimeridian_points`],
/// ascending.
pub fn antimeridian_west_wrap_longitudes() -> Vec<f64> {
    vec![
        -210.0, -205.0, -200.0, -195.0, -190.0, -185.0, -180.1, -179.9, -175.0, -170.0, -165.0,
        -160.0,
    ]
}

/// A regular lattice of points with `step` degrees spacing.
///
/// Latitudes run over [-90, 90] and longitudes over [-180, 180), both
/// inclusive of the lower bound. Every point has measure 1.
pub fn lattice_points(step: f64) -> Vec<WeightedPoint> {
    let mut points = Vec::new();
    let mut lat = -90.0;
    while lat <= 90.0 {
        let mut lon = -180.0;
        while lon < 180.0 {
            points.push(WeightedPoint::new(lat, lon, 1.0));
            lon += step;
        }
        lat += step;
    }
    points
}

/// Uniformly distributed points over the globe, reproducible for a seed.
///
/// Measures are drawn from [0, 100).
pub fn random_points(count: usize, seed: u64) -> Vec<WeightedPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            WeightedPoint::new(
                rng.gen_range(-90.0..=90.0),
                rng.gen_range(-180.0..180.0),
                rng.gen_range(0.0..100.0),
            )
        })
        .collect()
}

/// Points clustered around `(lat, lon)` within `spread` degrees.
pub fn clustered_points(
    count: usize,
    lat: f64,
    lon: f64,
    spread: f64,
    seed: u64,
) -> Vec<WeightedPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let dlat: f64 = rng.gen_range(-spread..=spread);
            let dlon: f64 = rng.gen_range(-spread..=spread);
            WeightedPoint::new(
                (lat + dlat).clamp(-90.0, 90.0),
                lon + dlon,
                rng.gen_range(1.0..10.0),
            )
        })
        .collect()
}

/// Points on the equator with measures `1..=count`.
pub fn ramp_points(count: usize) -> Vec<WeightedPoint> {
    (0..count)
        .map(|i| WeightedPoint::new(0.0, i as f64 * 0.1, (i + 1) as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_antimeridian_layout() {
        let points = antimeridian_points();
        assert_eq!(points.first().map(|p| p.latitude), Some(45.0));
        assert_eq!(points.last().map(|p| p.latitude), Some(-35.0));
        assert!(points.iter().all(|p| p.measure > 0.0));
    }

    #[test]
    fn test_lattice_count() {
        // 19 latitudes (-90..=90 by 10) x 36 longitudes (-180..180 by 10)
        assert_eq!(lattice_points(10.0).len(), 19 * 36);
    }

    #[test]
    fn test_random_points_reproducible() {
        assert_eq!(random_points(50, 7), random_points(50, 7));
        assert_ne!(random_points(50, 7), random_points(50, 8));
    }

    #[test]
    fn test_ramp_points() {
        let points = ramp_points(4);
        let measures: Vec<f64> = points.iter().map(|p| p.measure).collect();
        assert_eq!(measures, vec![1.0, 2.0, 3.0, 4.0]);
    }
}
