//! Storage strategy selection.

use heatmap_common::HeatmapError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the index stores its points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexMode {
    /// Dense 1-degree grid over the globe. Query cost scales with region area.
    Grid,
    /// Flat list. Query cost scales with point count.
    Array,
}

impl IndexMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Array => "array",
        }
    }
}

impl Default for IndexMode {
    fn default() -> Self {
        Self::Grid
    }
}

impl FromStr for IndexMode {
    type Err = HeatmapError;

    /// Parse a mode name (case-insensitive). Unknown names are an error, never
    /// a silent default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "array" => Ok(Self::Array),
            _ => Err(HeatmapError::InvalidIndexMode(s.to_string())),
        }
    }
}

impl fmt::Display for IndexMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
