//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use reachy_mini_domain::error::ReachyError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`ReachyError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(ReachyError);

impl From<ReachyError> for ApiError {
    fn from(err: ReachyError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ReachyError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ReachyError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            ReachyError::Duplicate(err) => (StatusCode::CONFLICT, err.to_string()),
            ReachyError::Device(err) => {
                tracing::error!(error = %err, "device error");
                (StatusCode::BAD_GATEWAY, "robot unavailable".to_string())
            }
            ReachyError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
