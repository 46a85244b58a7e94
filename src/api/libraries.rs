//! Library and item listing endpoints

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, api_error, catalog_error};
use crate::AppState;
use crate::services::{AnnotatedItem, MatchReport, annotate_items};

#[derive(Debug, Deserialize)]
pub struct ItemsQuery {
    /// Run the folder-name match check (defaults to the configured value)
    match_check: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub library: String,
    pub library_id: String,
    pub items: Vec<AnnotatedItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<MatchReport>,
}

/// List library names
async fn list_libraries(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let names = state
        .catalog
        .read(|c| c.libraries().list_names())
        .await
        .map_err(catalog_error)?;
    Ok(Json(names))
}

/// List the book items of a library, optionally with match results
async fn list_items(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<ItemsQuery>,
) -> Result<Json<ItemsResponse>, ApiError> {
    let match_check = query.match_check.unwrap_or(state.config.match_check);

    let lookup = name.clone();
    let found = state
        .catalog
        .read(move |c| {
            let Some(library_id) = c.libraries().id_by_name(&lookup)? else {
                return Ok(None);
            };
            let items = c.items().list_by_library(&library_id)?;
            Ok(Some((library_id, items)))
        })
        .await
        .map_err(catalog_error)?;

    let Some((library_id, items)) = found else {
        return Err(api_error(
            StatusCode::NOT_FOUND,
            format!("Library '{}' not found", name),
        ));
    };

    let items = annotate_items(items, match_check);
    let report = match_check.then(|| MatchReport::from_items(&items));

    Ok(Json(ItemsResponse {
        library: name,
        library_id,
        items,
        report,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/libraries", get(list_libraries))
        .route("/libraries/{name}/items", get(list_items))
}
