//! Health check endpoint.

use axum::Json;
use common::HealthStatus;

/// Service name reported by the health check.
pub const SERVICE_NAME: &str = "IMDTravel";

/// GET /health — returns a fixed liveness payload.
pub async fn check() -> Json<HealthStatus> {
    Json(HealthStatus::healthy(SERVICE_NAME))
}
