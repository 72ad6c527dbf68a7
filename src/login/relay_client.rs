use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::models::provider::OauthProvider;
use crate::responses::ErrorResponse;
use crate::services::oauth::{
    relay::{ExchangeRequest, ExchangeResponse},
    token::AccessToken,
};

#[derive(Debug, Error)]
pub enum RelayClientError {
    #[error("relay rejected the login ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("could not reach the relay: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("relay returned an unexpected body: {0}")]
    InvalidResponse(String),
}

/// Trades an authorization code for an access token without the client ever
/// holding the provider's client secret.
#[async_trait]
pub trait TokenRelay: Send + Sync {
    async fn exchange(
        &self,
        provider: OauthProvider,
        code: &str,
    ) -> Result<AccessToken, RelayClientError>;
}

#[derive(Clone)]
pub struct HttpTokenRelay {
    client: Client,
    base_url: String,
}

impl HttpTokenRelay {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn callback_url(&self, provider: OauthProvider) -> String {
        format!("{}/api/{}/callback", self.base_url, provider.slug())
    }
}

#[async_trait]
impl TokenRelay for HttpTokenRelay {
    async fn exchange(
        &self,
        provider: OauthProvider,
        code: &str,
    ) -> Result<AccessToken, RelayClientError> {
        let res = self
            .client
            .post(self.callback_url(provider))
            .json(&ExchangeRequest::new(code))
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|err| err.error)
                .unwrap_or_else(|_| format!("relay responded with status {}", status.as_u16()));
            return Err(RelayClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ExchangeResponse = serde_json::from_str(&body)
            .map_err(|err| RelayClientError::InvalidResponse(err.to_string()))?;
        if parsed.access_token.is_empty() {
            return Err(RelayClientError::InvalidResponse(
                "empty access_token".to_string(),
            ));
        }
        Ok(AccessToken::new(parsed.access_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn relay(server: &MockServer) -> HttpTokenRelay {
        HttpTokenRelay::new(Client::new(), server.base_url())
    }

    #[tokio::test]
    async fn posts_code_and_returns_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/github/callback")
                .json_body(json!({ "code": "abc" }));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "access_token": "gho_123" }));
        });

        let token = relay(&server)
            .exchange(OauthProvider::Github, "abc")
            .await
            .unwrap();

        mock.assert();
        assert_eq!(token.secret(), "gho_123");
    }

    #[tokio::test]
    async fn relay_error_text_is_surfaced() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/github/callback");
            then.status(400)
                .header("content-type", "application/json")
                .json_body(json!({ "error": "The code passed is incorrect or expired." }));
        });

        let err = relay(&server)
            .exchange(OauthProvider::Github, "stale")
            .await
            .unwrap_err();

        match err {
            RelayClientError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "The code passed is incorrect or expired.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_failure_falls_back_to_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/github/callback");
            then.status(502).body("Bad Gateway");
        });

        let err = relay(&server)
            .exchange(OauthProvider::Github, "abc")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RelayClientError::Rejected { status: 502, ref message } if message == "relay responded with status 502"
        ));
    }

    #[tokio::test]
    async fn unreachable_relay_is_a_transport_error() {
        let relay = HttpTokenRelay::new(Client::new(), "http://127.0.0.1:1/");
        assert_eq!(
            relay.callback_url(OauthProvider::Google),
            "http://127.0.0.1:1/api/google/callback"
        );

        let err = relay.exchange(OauthProvider::Github, "abc").await.unwrap_err();
        assert!(matches!(err, RelayClientError::Transport(_)));
    }
}
