//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use saga::SagaError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Saga execution error.
    Saga(SagaError),
    /// Internal server error.
    Internal(String),
}

impl ApiError {
    /// HTTP status, classification and detail text for this error.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            ApiError::Saga(err) => (saga_error_status(err), err.classification(), err.to_string()),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                msg.clone(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, classification, detail) = self.parts();

        if status.is_server_error() {
            tracing::error!(%status, error = classification, %detail, "request failed");
        } else {
            tracing::info!(%status, error = classification, %detail, "request rejected");
        }

        let body = serde_json::json!({ "error": classification, "detail": detail });
        (status, axum::Json(body)).into_response()
    }
}

fn saga_error_status(err: &SagaError) -> StatusCode {
    match err {
        SagaError::Validation(_) => StatusCode::BAD_REQUEST,
        SagaError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        SagaError::DeadlineExceeded { .. } => StatusCode::GATEWAY_TIMEOUT,
        SagaError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<SagaError> for ApiError {
    fn from(err: SagaError) -> Self {
        ApiError::Saga(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
