//! API error type
//!
//! The decoder itself never fails; these are the request-layer errors the
//! original frontend expects as a JSON `{ "error": ... }` body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No file content provided")]
    MissingContent,

    #[error("No valid messages found in file")]
    NoValidMessages,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::warn!("Rejecting process request: {}", self);
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}
