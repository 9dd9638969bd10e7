//! Region queries with antimeridian correction.
//!
//! A region whose longitude bounds run past ±180 is answered in three passes:
//!
//! ```text
//!   requested:     [-225 ............................ -160]
//!   primary pass:          [-180 ......... -160]             original region test
//!   wrap-before:   [135 .. 180]  re-emitted at lon - 360     auxiliary region test
//! ```
//!
//! The wrap-after pass mirrors wrap-before for windows past +180. All passes
//! are concatenated and sorted so the output is independent of storage order.

use std::cmp::Ordering;

use heatmap_common::region::MAX_LONGITUDE;
use heatmap_common::{Region, WeightedPoint};

/// Candidate enumeration for a storage strategy.
///
/// Implementations may yield points outside the requested bounds; callers
/// apply the containment test themselves.
pub trait PointStore {
    /// Visit every stored point that may lie within the given clamped
    /// latitude and longitude bounds.
    fn for_each_candidate<F>(&self, lat: (f64, f64), lon: (f64, f64), f: F)
    where
        F: FnMut(&WeightedPoint);
}

/// Answer a region query against `store`.
pub fn wrapped_query<S: PointStore>(store: &S, region: &Region) -> Vec<WeightedPoint> {
    let lat = region.clamped_lat();
    let lon = region.clamped_lon();
    let mut out = Vec::new();

    store.for_each_candidate(lat, lon, |p| {
        if region.contains(p.latitude, p.longitude) {
            out.push(*p);
        }
    });

    let before = region.wrap_before();
    if before > 0.0 {
        let aux = Region::new(lat.0, lat.1, MAX_LONGITUDE - before, MAX_LONGITUDE);
        collect_shifted(store, &aux, -360.0, &mut out);
    }

    let after = region.wrap_after();
    if after > 0.0 {
        let aux = Region::new(lat.0, lat.1, -MAX_LONGITUDE, -MAX_LONGITUDE + after);
        collect_shifted(store, &aux, 360.0, &mut out);
    }

    sort_points(&mut out);
    out
}

fn collect_shifted<S: PointStore>(
    store: &S,
    aux: &Region,
    delta: f64,
    out: &mut Vec<WeightedPoint>,
) {
    store.for_each_candidate(aux.clamped_lat(), aux.clamped_lon(), |p| {
        if aux.contains(p.latitude, p.longitude) {
            out.push(p.shifted(delta));
        }
    });
}

/// Ascending by latitude, then longitude, then measure.
pub fn compare_points(a: &WeightedPoint, b: &WeightedPoint) -> Ordering {
    a.latitude
        .total_cmp(&b.latitude)
        .then_with(|| a.longitude.total_cmp(&b.longitude))
        .then_with(|| a.measure.total_cmp(&b.measure))
}

pub fn sort_points(points: &mut [WeightedPoint]) {
    points.sort_by(compare_points);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_orders_by_lat_then_lon() {
        let mut points = vec![
            WeightedPoint::new(1.0, 5.0, 1.0),
            WeightedPoint::new(0.0, 9.0, 1.0),
            WeightedPoint::new(1.0, -5.0, 1.0),
            WeightedPoint::new(0.0, 2.0, 1.0),
        ];
        sort_points(&mut points);
        let order: Vec<(f64, f64)> = points.iter().map(|p| (p.latitude, p.longitude)).collect();
        assert_eq!(order, vec![(0.0, 2.0), (0.0, 9.0), (1.0, -5.0), (1.0, 5.0)]);
    }

    #[test]
    fn test_compare_ties_on_longitude_are_resolved() {
        let a = WeightedPoint::new(3.0, 10.0, 1.0);
        let b = WeightedPoint::new(3.0, 11.0, 1.0);
        assert_eq!(compare_points(&a, &b), Ordering::Less);
        assert_eq!(compare_points(&b, &a), Ordering::Greater);
        assert_eq!(compare_points(&a, &a), Ordering::Equal);
    }
}
