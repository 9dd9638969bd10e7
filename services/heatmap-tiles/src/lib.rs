//! Heatmap tile service library.
//!
//! Exposes the router and its pieces so the handlers can be exercised without
//! binding a socket.

pub mod handlers;
pub mod points;
pub mod state;

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::get,
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the application router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        // Tiles
        .route("/tiles/:z/:x/:y", get(handlers::tile_handler))
        // Style
        .route(
            "/api/style",
            get(handlers::get_style_handler).put(handlers::put_style_handler),
        )
        // Health check
        .route("/health", get(handlers::health_handler))
        // Metrics
        .route("/metrics", get(handlers::metrics_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
