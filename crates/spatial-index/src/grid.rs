//! Dense one-degree grid over the globe.
//!
//! The table has one cell per integer degree: 181 latitude rows (-90..=90) by
//! 361 longitude columns (-180..=180), stored row-major in a single `Vec`.
//! A point lives in the cell `(floor(lat), floor(lon))`; coordinates outside
//! the globe are bucketed into the nearest border cell but stored unchanged.

use heatmap_common::WeightedPoint;

use crate::query::PointStore;

/// Number of latitude rows (-90..=90).
pub const LAT_CELLS: usize = 181;
/// Number of longitude columns (-180..=180).
pub const LON_CELLS: usize = 361;

#[derive(Debug, Clone)]
pub struct GridIndex {
    cells: Vec<Vec<WeightedPoint>>,
    len: usize,
}

impl GridIndex {
    pub fn build(points: Vec<WeightedPoint>) -> Self {
        let mut cells = vec![Vec::new(); LAT_CELLS * LON_CELLS];
        let len = points.len();
        for point in points {
            let idx = cell_index(lat_cell(point.latitude), lon_cell(point.longitude));
            cells[idx].push(point);
        }
        Self { cells, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Points in the cell for integer degrees `(lat, lon)`.
    #[cfg(test)]
    pub(crate) fn cell(&self, lat: i32, lon: i32) -> &[WeightedPoint] {
        &self.cells[cell_index(lat_cell(lat as f64), lon_cell(lon as f64))]
    }

    /// Number of cells holding at least one point.
    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeightedPoint> {
        self.cells.iter().flatten()
    }
}

impl PointStore for GridIndex {
    fn for_each_candidate<F>(&self, lat: (f64, f64), lon: (f64, f64), mut f: F)
    where
        F: FnMut(&WeightedPoint),
    {
        let (lat_lo, lat_hi) = (lat_cell(lat.0), lat_cell(lat.1));
        let (lon_lo, lon_hi) = (lon_cell(lon.0), lon_cell(lon.1));
        if lat_lo > lat_hi || lon_lo > lon_hi {
            return;
        }

        for row in lat_lo..=lat_hi {
            let start = row * LON_CELLS;
            for cell in &self.cells[start + lon_lo..=start + lon_hi] {
                cell.iter().for_each(&mut f);
            }
        }
    }
}

#[inline]
fn lat_cell(lat: f64) -> usize {
    (lat.floor().clamp(-90.0, 90.0) + 90.0) as usize
}

#[inline]
fn lon_cell(lon: f64) -> usize {
    (lon.floor().clamp(-180.0, 180.0) + 180.0) as usize
}

#[inline]
fn cell_index(lat_cell: usize, lon_cell: usize) -> usize {
    lat_cell * LON_CELLS + lon_cell
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucketing_uses_floor() {
        let grid = GridIndex::build(vec![
            WeightedPoint::new(10.5, 20.5, 1.0),
            WeightedPoint::new(-0.5, -0.5, 1.0),
            WeightedPoint::new(90.0, 180.0, 1.0),
            WeightedPoint::new(-90.0, -180.0, 1.0),
        ]);
        assert_eq!(grid.cell(10, 20).len(), 1);
        assert_eq!(grid.cell(-1, -1).len(), 1);
        assert_eq!(grid.cell(90, 180).len(), 1);
        assert_eq!(grid.cell(-90, -180).len(), 1);
        assert_eq!(grid.occupied_cells(), 4);
        assert_eq!(grid.len(), 4);
    }

    #[test]
    fn test_out_of_range_points_clamp_to_border() {
        let grid = GridIndex::build(vec![WeightedPoint::new(0.0, 250.0, 1.0)]);
        let stored = grid.cell(0, 180);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].longitude, 250.0);
    }

    #[test]
    fn test_candidates_limited_to_cells() {
        let grid = GridIndex::build(vec![
            WeightedPoint::new(0.5, 0.5, 1.0),
            WeightedPoint::new(5.5, 5.5, 1.0),
        ]);
        let mut seen = Vec::new();
        grid.for_each_candidate((0.0, 1.0), (0.0, 1.0), |p| seen.push(*p));
        assert_eq!(seen, vec![WeightedPoint::new(0.5, 0.5, 1.0)]);
    }

    #[test]
    fn test_inverted_bounds_scan_nothing() {
        let grid = GridIndex::build(vec![WeightedPoint::new(0.5, 0.5, 1.0)]);
        let mut count = 0;
        grid.for_each_candidate((10.0, -10.0), (0.0, 1.0), |_| count += 1);
        assert_eq!(count, 0);
    }
}
