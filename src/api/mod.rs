//! API route definitions
//!
//! The primary interface is the HTML form served at `/`.
//! JSON endpoints under `/api` expose the same catalog, match check and
//! export operations for scripting.

pub mod export;
pub mod health;
pub mod libraries;
pub mod ui;

use axum::{Json, http::StatusCode};
use serde::Serialize;

use crate::catalog::CatalogError;
use crate::services::ExportRequestError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error response for JSON handlers
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub(crate) fn catalog_error(e: CatalogError) -> ApiError {
    tracing::error!(error = %e, "Catalog read failed");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

pub(crate) fn export_request_error(e: ExportRequestError) -> ApiError {
    match e {
        ExportRequestError::Catalog(e) => catalog_error(e),
        other @ ExportRequestError::UnknownLibrary(_) => {
            api_error(StatusCode::NOT_FOUND, other.to_string())
        }
        other => api_error(StatusCode::BAD_REQUEST, other.to_string()),
    }
}
