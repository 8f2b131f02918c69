//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use marketplace::SyncError;

/// API-level error type that maps to HTTP responses.
///
/// Marketplace rejections are not errors at this level: they travel inside
/// the sync report with a `200 OK`. Only faults that leave the coordinator
/// without a report end up here.
#[derive(Debug)]
pub enum ApiError {
    /// Upstream marketplace transport failure.
    Sync(SyncError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Sync(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        ApiError::Sync(err)
    }
}
