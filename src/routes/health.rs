use axum::response::{IntoResponse, Response};

use crate::responses::HealthResponse;

/// Liveness probe; no auth, no dependencies.
pub async fn health_check() -> Response {
    HealthResponse::ok("Backend server is running").into_response()
}
