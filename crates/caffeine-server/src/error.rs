//! Error types for the HTTP API.
//!
//! [`ApiError`] unifies all request-level failure modes into a single enum
//! that converts into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use caffeine_core::TrackerError;

/// Errors that can occur while handling an API request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body could not be parsed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The tracker refused to log the dose.
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Tracker(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
