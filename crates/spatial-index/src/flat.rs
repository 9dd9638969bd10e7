//! Flat point list.

use heatmap_common::WeightedPoint;

use crate::query::PointStore;

/// The input points, kept in ingestion order.
///
/// Every query scans the full list; the region containment test is the only
/// filter.
#[derive(Debug, Clone, Default)]
pub struct FlatIndex {
    points: Vec<WeightedPoint>,
}

impl FlatIndex {
    pub fn build(points: Vec<WeightedPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn as_slice(&self) -> &[WeightedPoint] {
        &self.points
    }
}

impl PointStore for FlatIndex {
    fn for_each_candidate<F>(&self, _lat: (f64, f64), _lon: (f64, f64), f: F)
    where
        F: FnMut(&WeightedPoint),
    {
        self.points.iter().for_each(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_keeps_order() {
        let points = vec![
            WeightedPoint::new(5.0, 5.0, 1.0),
            WeightedPoint::new(-5.0, -5.0, 2.0),
        ];
        let flat = FlatIndex::build(points.clone());
        assert_eq!(flat.as_slice(), points.as_slice());
    }
}
