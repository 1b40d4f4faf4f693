//! Router definition for the upload and download endpoints

use axum::{extract::DefaultBodyLimit, routing::*, Router};
use tower_http::cors::CorsLayer;

use super::handlers::{self, AppState};

pub fn create_router(state: &AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/upload", post(handlers::upload_handler))
        .route("/api/download/:code", get(handlers::download_handler))
        .with_state(state.clone())
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(CorsLayer::permissive())
}
