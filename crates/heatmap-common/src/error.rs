//! Error types for the heatmap tile crates.

use thiserror::Error;

/// Result type alias using HeatmapError.
pub type HeatmapResult<T> = Result<T, HeatmapError>;

/// Primary error type for heatmap operations.
#[derive(Debug, Error)]
pub enum HeatmapError {
    // === Configuration Errors ===
    #[error("Invalid index mode '{0}': expected 'grid' or 'array'")]
    InvalidIndexMode(String),

    #[error("Invalid interval type '{0}': expected 'continuous' or 'quantiles'")]
    InvalidInterval(String),

    #[error("Invalid color '{0}'")]
    InvalidColor(String),

    #[error("Invalid color scale: {0}")]
    InvalidScale(String),

    #[error("Quantile intervals require a point set")]
    MissingPoints,

    #[error("Configuration error: {0}")]
    Config(String),

    // === Request Errors ===
    #[error("Invalid tile {z}/{x}/{y}: {message}")]
    InvalidTile {
        z: u32,
        x: u32,
        y: u32,
        message: String,
    },

    // === Data Errors ===
    #[error("Invalid point at index {index}: {message}")]
    InvalidPoint { index: usize, message: String },

    #[error("Failed to parse input: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(String),

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    Render(String),
}

impl HeatmapError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            HeatmapError::InvalidIndexMode(_)
            | HeatmapError::InvalidInterval(_)
            | HeatmapError::InvalidColor(_)
            | HeatmapError::InvalidScale(_)
            | HeatmapError::InvalidTile { .. }
            | HeatmapError::InvalidPoint { .. }
            | HeatmapError::Parse(_) => 400,

            HeatmapError::MissingPoints
            | HeatmapError::Config(_)
            | HeatmapError::Io(_)
            | HeatmapError::Render(_) => 500,
        }
    }

    pub fn invalid_tile(z: u32, x: u32, y: u32, message: impl Into<String>) -> Self {
        Self::InvalidTile {
            z,
            x,
            y,
            message: message.into(),
        }
    }

    pub fn invalid_point(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidPoint {
            index,
            message: message.into(),
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for HeatmapError {
    fn from(err: std::io::Error) -> Self {
        HeatmapError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HeatmapError {
    fn from(err: serde_json::Error) -> Self {
        HeatmapError::Parse(format!("JSON error: {}", err))
    }
}

impl From<crate::color::ColorParseError> for HeatmapError {
    fn from(err: crate::color::ColorParseError) -> Self {
        HeatmapError::InvalidColor(err.to_string())
    }
}
