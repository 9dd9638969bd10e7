//! Point set loading.
//!
//! The input file is a JSON array of `{"latitude", "longitude", "measure"}`
//! objects. The whole file is rejected if any entry fails validation; the
//! error names the offending index.

use std::path::Path;

use heatmap_common::{points_from_json, HeatmapError, HeatmapResult, WeightedPoint};
use tracing::info;

pub fn load_points(path: &Path) -> HeatmapResult<Vec<WeightedPoint>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| HeatmapError::Io(format!("{}: {}", path.display(), e)))?;
    let points = points_from_json(&contents)?;
    info!(path = %path.display(), count = points.len(), "Loaded points");
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_json(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_points() {
        let file = write_json(
            r#"[
                {"latitude": 10.0, "longitude": -20.0, "measure": 1.5},
                {"latitude": -45.5, "longitude": 179.9, "measure": 0}
            ]"#,
        );
        let points = load_points(file.path()).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], WeightedPoint::new(10.0, -20.0, 1.5));
        assert_eq!(points[1].measure, 0.0);
    }

    #[test]
    fn test_negative_measure_names_index() {
        let file = write_json(
            r#"[
                {"latitude": 0, "longitude": 0, "measure": 1},
                {"latitude": 0, "longitude": 0, "measure": 2},
                {"latitude": 0, "longitude": 0, "measure": -3}
            ]"#,
        );
        let result = load_points(file.path());
        assert!(matches!(result, Err(HeatmapError::InvalidPoint { index: 2, .. })));
    }

    #[test]
    fn test_malformed_json() {
        let file = write_json(r#"[{"latitude": 0, "longitude": 0}]"#);
        assert!(matches!(load_points(file.path()), Err(HeatmapError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_points(&dir.path().join("points.json"));
        assert!(matches!(result, Err(HeatmapError::Io(_))));
    }
}
