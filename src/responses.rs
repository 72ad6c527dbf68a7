use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::services::oauth::errors::ExchangeError;
use crate::utils::redact::redact_secret;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    fn with_status(
        status: StatusCode,
        msg: &str,
        details: Option<String>,
    ) -> (StatusCode, Json<ErrorResponse>) {
        (
            status,
            Json(ErrorResponse {
                error: msg.to_string(),
                details,
            }),
        )
    }

    pub fn not_found(msg: &str) -> impl IntoResponse {
        Self::with_status(StatusCode::NOT_FOUND, msg, None)
    }

    pub fn too_many_requests(msg: &str) -> impl IntoResponse {
        Self::with_status(StatusCode::TOO_MANY_REQUESTS, msg, None)
    }

    /// Maps an exchange failure to its status and a caller-safe body. Server
    /// errors carry diagnostic details with `secret` scrubbed out.
    pub fn from_exchange_error(err: &ExchangeError, secret: &str) -> impl IntoResponse {
        let details = if err.is_server_error() {
            err.details().map(|d| redact_secret(&d, secret))
        } else {
            None
        };
        Self::with_status(err.status_code(), &redact_secret(&err.public_message(), secret), details)
    }
}

impl HealthResponse {
    pub fn ok(msg: &str) -> impl IntoResponse {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                message: msg.to_string(),
            }),
        )
    }
}
