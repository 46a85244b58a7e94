//! Application state and HTTP router construction.
//!
//! Used by the binary and by the integration tests to build the Axum app.

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::services::Exporter;

/// Shared state for HTTP handlers (HTML pages, API routes).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Catalog,
    pub exporter: Exporter,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            catalog: Catalog::new(config.csv_db_path.clone()),
            exporter: Exporter::new(config.media_root.clone()),
            config,
        }
    }
}

/// Build the full Axum router: HTML form pages, /api, health, and layers.
/// Returns Router<()> (state fully applied) for use with axum::serve.
pub fn build_app(state: AppState) -> Router<()> {
    Router::new()
        .merge(api::health::router())
        .merge(api::ui::router())
        .nest("/api", api::libraries::router().merge(api::export::router()))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}
