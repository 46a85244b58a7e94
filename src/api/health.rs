//! Health check endpoints

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub catalog: bool,
    pub media_root: bool,
}

/// Health check - always returns OK if the server is running
async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness check - verifies the CSV export and media root are reachable
async fn readyz(State(state): State<AppState>) -> Json<ReadyResponse> {
    let catalog_ok = state.catalog.is_available();
    let media_ok = state.config.media_root.is_dir();

    Json(ReadyResponse {
        ready: catalog_ok && media_ok,
        catalog: catalog_ok,
        media_root: media_ok,
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}
