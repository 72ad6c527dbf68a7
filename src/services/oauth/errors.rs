use axum::http::StatusCode;
use thiserror::Error;

use crate::models::provider::OauthProvider;

const TOKEN_EXCHANGE_FALLBACK: &str = "Failed to exchange code for token";

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("Authorization code is required")]
    MissingCode,
    #[error("Unsupported OAuth provider: {0}")]
    UnsupportedProvider(String),
    #[error("{provider} rejected the token request: {error}")]
    ProviderRejected {
        provider: OauthProvider,
        error: String,
        description: Option<String>,
    },
    #[error("No access token received from {provider}")]
    MissingAccessToken { provider: OauthProvider },
    #[error("{provider} request failed: {message}")]
    Transport {
        provider: OauthProvider,
        message: String,
    },
    #[error("{provider} responded with status {status}")]
    UpstreamStatus {
        provider: OauthProvider,
        status: u16,
        body: String,
    },
    #[error("{provider} returned an invalid response: {message}")]
    InvalidResponse {
        provider: OauthProvider,
        message: String,
        body: String,
    },
}

impl ExchangeError {
    pub fn transport(provider: OauthProvider, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {err}")
        } else {
            err.to_string()
        };
        ExchangeError::Transport { provider, message }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ExchangeError::MissingCode
            | ExchangeError::ProviderRejected { .. }
            | ExchangeError::MissingAccessToken { .. } => StatusCode::BAD_REQUEST,
            ExchangeError::UnsupportedProvider(_) => StatusCode::NOT_FOUND,
            ExchangeError::Transport { .. }
            | ExchangeError::UpstreamStatus { .. }
            | ExchangeError::InvalidResponse { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Infrastructure failures; the caller may try again later.
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Text that is safe to hand back to the caller.
    pub fn public_message(&self) -> String {
        match self {
            ExchangeError::ProviderRejected { description, .. } => description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or(TOKEN_EXCHANGE_FALLBACK)
                .to_string(),
            ExchangeError::Transport { provider, .. }
            | ExchangeError::UpstreamStatus { provider, .. }
            | ExchangeError::InvalidResponse { provider, .. } => {
                format!("Internal server error during {provider} authentication")
            }
            other => other.to_string(),
        }
    }

    /// Diagnostic detail attached to server errors. Callers must redact it
    /// before it leaves the process.
    pub fn details(&self) -> Option<String> {
        match self {
            ExchangeError::Transport { message, .. } => Some(message.clone()),
            ExchangeError::UpstreamStatus { status, body, .. } => {
                Some(format!("upstream status {status}: {body}"))
            }
            ExchangeError::InvalidResponse { message, body, .. } => {
                Some(format!("{message}: {body}"))
            }
            _ => None,
        }
    }
}
