//! JSON export endpoint

use std::path::Path;

use axum::{Json, Router, extract::State, routing::post};

use super::{ApiError, export_request_error};
use crate::AppState;
use crate::catalog::LibraryItem;
use crate::services::{ExportRequest, ExportRequestError, ExportSummary};

/// Export the selected items of a library
async fn export(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<Json<ExportSummary>, ApiError> {
    let (library_id, items) = resolve_request(&state, request.clone())
        .await
        .map_err(export_request_error)?;

    tracing::info!(
        library = %request.library,
        library_id = %library_id,
        items = items.len(),
        export_path = %request.export_path,
        "Export requested via API"
    );

    let summary = state
        .exporter
        .export_items(&items, Path::new(request.export_path.trim()))
        .await;
    Ok(Json(summary))
}

/// Validate an export request against the catalog on the blocking pool.
/// Shared by the JSON endpoint and the HTML form.
pub(crate) async fn resolve_request(
    state: &AppState,
    request: ExportRequest,
) -> Result<(String, Vec<LibraryItem>), ExportRequestError> {
    state
        .catalog
        .read(move |c| Ok(request.resolve(c)))
        .await?
}

pub fn router() -> Router<AppState> {
    Router::new().route("/export", post(export))
}
