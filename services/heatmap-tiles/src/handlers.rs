//! HTTP request handlers.
//!
//! - `GET /tiles/:z/:x/:y[.png]`: rendered tile
//! - `GET /api/style`, `PUT /api/style`: read and update the layer style
//! - `GET /health`, `GET /metrics`

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use heatmap_common::{Color, HeatmapError, TileCoord};
use heatmap_layer::{LayerSettings, LayerSnapshot, RadiusConfig};
use renderer::IntervalType;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::state::AppState;

// ============================================================================
// Errors
// ============================================================================

/// An error rendered as `{"error": "..."}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<HeatmapError> for ApiError {
    fn from(err: HeatmapError) -> Self {
        let status = StatusCode::from_u16(err.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

// ============================================================================
// Tiles
// ============================================================================

/// GET /tiles/:z/:x/:y - Render one WorldCRS84Quad tile as PNG.
///
/// `y` may carry a `.png` suffix; no other format is served.
#[instrument(skip(state))]
pub async fn tile_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((z, x, y)): Path<(u32, u32, String)>,
) -> Result<Response, ApiError> {
    let (y_str, format) = y.rsplit_once('.').unwrap_or((y.as_str(), "png"));
    if !format.eq_ignore_ascii_case("png") {
        return Err(ApiError::bad_request(format!(
            "Unsupported tile format '{}'",
            format
        )));
    }
    let y: u32 = y_str
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid tile row '{}'", y_str)))?;

    let coord = TileCoord::new(z, x, y);
    let render_state = Arc::clone(&state);
    let png = tokio::task::spawn_blocking(move || {
        let tile = render_state.orchestrator.render_tile(&coord)?;
        tile.encode_png()
    })
    .await
    .map_err(|e| {
        error!(error = %e, tile = %coord, "Render task failed");
        ApiError::internal("Render task failed")
    })??;

    Ok((
        [(header::CONTENT_TYPE, "image/png")],
        Bytes::from(png),
    )
        .into_response())
}

// ============================================================================
// Style
// ============================================================================

/// Current layer style.
#[derive(Debug, Serialize, Deserialize)]
pub struct StyleResponse {
    #[serde(flatten)]
    pub settings: LayerSettings,
    pub generation: u64,
}

impl From<&LayerSnapshot> for StyleResponse {
    fn from(snapshot: &LayerSnapshot) -> Self {
        Self {
            settings: snapshot.settings.clone(),
            generation: snapshot.generation,
        }
    }
}

/// Partial style update; absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleUpdate {
    pub scale: Option<Vec<Color>>,
    pub interval: Option<IntervalType>,
    pub radius: Option<RadiusConfig>,
    pub blur: Option<f64>,
    pub intensity_increment: Option<f64>,
}

impl StyleUpdate {
    pub fn apply(self, settings: &mut LayerSettings) {
        if let Some(scale) = self.scale {
            settings.scale = scale;
        }
        if let Some(interval) = self.interval {
            settings.interval = interval;
        }
        if let Some(radius) = self.radius {
            settings.radius = radius;
        }
        if let Some(blur) = self.blur {
            settings.blur = blur;
        }
        if let Some(increment) = self.intensity_increment {
            settings.intensity_increment = increment;
        }
    }
}

/// GET /api/style
pub async fn get_style_handler(Extension(state): Extension<Arc<AppState>>) -> Json<StyleResponse> {
    Json(StyleResponse::from(state.layer.snapshot().as_ref()))
}

/// PUT /api/style - Rebuild the gradient and swap in the new snapshot.
#[instrument(skip(state, update))]
pub async fn put_style_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(update): Json<StyleUpdate>,
) -> Result<Json<StyleResponse>, ApiError> {
    let _guard = state.style_lock.lock().await;

    let mut settings = state.layer.snapshot().settings.clone();
    update.apply(&mut settings);

    let layer = Arc::clone(&state.layer);
    let snapshot = tokio::task::spawn_blocking(move || layer.configure(settings))
        .await
        .map_err(|e| {
            error!(error = %e, "Style update task failed");
            ApiError::internal("Style update task failed")
        })?
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    info!(generation = snapshot.generation, "Style updated");
    Ok(Json(StyleResponse::from(snapshot.as_ref())))
}

// ============================================================================
// Health and metrics
// ============================================================================

/// GET /health - Basic health check
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    match &state.prometheus {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "Metrics recorder not installed").into_response(),
    }
}
