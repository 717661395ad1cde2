//! Saga error types.

use std::time::Duration;

use thiserror::Error;

use crate::step::PurchaseStep;

/// Errors that end a purchase saga without a result.
#[derive(Debug, Error)]
pub enum SagaError {
    /// The inbound request is malformed; no collaborator was called.
    #[error("Invalid purchase request: {0}")]
    Validation(String),

    /// A collaborator failed and no fallback applied.
    #[error("{service} failed during {step}: {reason}")]
    Upstream {
        step: PurchaseStep,
        service: &'static str,
        reason: String,
    },

    /// A collaborator did not answer within the step's deadline.
    #[error("{service} did not respond within {timeout:?} during {step}")]
    DeadlineExceeded {
        step: PurchaseStep,
        service: &'static str,
        timeout: Duration,
    },

    /// Unclassified failure inside the saga itself.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SagaError {
    /// Short machine-readable classification used in API responses and metric labels.
    pub fn classification(&self) -> &'static str {
        match self {
            SagaError::Validation(_) => "validation_error",
            SagaError::Upstream { .. } => "upstream_error",
            SagaError::DeadlineExceeded { .. } => "deadline_exceeded",
            SagaError::Internal(_) => "internal_error",
        }
    }
}

/// Failure of a single call to a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The connection could not be established or was dropped.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The transport gave up waiting for the collaborator.
    #[error("request timed out")]
    Timeout,

    /// The collaborator answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The collaborator answered with a body we could not read.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Connection failures, timeouts and 5xx responses are transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Connection(_) | ServiceError::Timeout => true,
            ServiceError::Status { status, .. } => *status >= 500,
            ServiceError::Decode(_) => false,
        }
    }

    /// Shorthand for an HTTP 500 with the given body.
    pub fn server_error(body: impl Into<String>) -> Self {
        ServiceError::Status {
            status: 500,
            body: body.into(),
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Timeout
        } else if err.is_decode() {
            ServiceError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ServiceError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            ServiceError::Connection(err.to_string())
        }
    }
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, SagaError>;
