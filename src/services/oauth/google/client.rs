use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client};
use tracing::debug;

use crate::config::OAuthProviderConfig;
use crate::models::{
    profile::{GoogleUserInfo, Profile},
    provider::OauthProvider,
};
use crate::services::oauth::{
    errors::ExchangeError,
    service::{OAuthProviderService, ProfileFetcher},
    token::{interpret_token_response, AccessToken},
};

const PROVIDER: OauthProvider = OauthProvider::Google;

/// Server-side code exchange for Google. Only wired up when a Google client
/// secret is configured.
#[derive(Clone)]
pub struct GoogleOAuthClient {
    client: Client,
    config: OAuthProviderConfig,
}

impl GoogleOAuthClient {
    pub fn new(client: Client, config: OAuthProviderConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl OAuthProviderService for GoogleOAuthClient {
    fn provider(&self) -> OauthProvider {
        PROVIDER
    }

    async fn exchange_code_for_token(&self, code: &str) -> Result<AccessToken, ExchangeError> {
        debug!(token_url = %self.config.token_url, "exchanging Google authorization code");

        let res = self
            .client
            .post(&self.config.token_url)
            .header(ACCEPT, "application/json")
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|err| ExchangeError::transport(PROVIDER, err))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|err| ExchangeError::transport(PROVIDER, err))?;

        interpret_token_response(PROVIDER, status, body)
    }
}

#[async_trait]
impl ProfileFetcher for GoogleOAuthClient {
    async fn fetch_profile(&self, token: &AccessToken) -> Result<Profile, ExchangeError> {
        let res = self
            .client
            .get(&self.config.user_info_url)
            .bearer_auth(token.secret())
            .send()
            .await
            .map_err(|err| ExchangeError::transport(PROVIDER, err))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|err| ExchangeError::transport(PROVIDER, err))?;

        if !status.is_success() {
            return Err(ExchangeError::UpstreamStatus {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        let info: GoogleUserInfo =
            serde_json::from_str(&body).map_err(|err| ExchangeError::InvalidResponse {
                provider: PROVIDER,
                message: err.to_string(),
                body,
            })?;

        Ok(Profile::from(info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::oauth::build_http_client;
    use httpmock::{Method::GET, Method::POST, MockServer};
    use serde_json::json;
    use std::time::Duration;

    fn client_for(server: &MockServer) -> GoogleOAuthClient {
        GoogleOAuthClient::new(
            build_http_client(Duration::from_secs(5)).unwrap(),
            OAuthProviderConfig {
                client_id: "g-client".into(),
                client_secret: "g-secret".into(),
                redirect_uri: "http://localhost:5173".into(),
                token_url: server.url("/token"),
                user_info_url: server.url("/v1/userinfo"),
            },
        )
    }

    #[tokio::test]
    async fn exchange_sends_authorization_code_grant() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/token")
                .x_www_form_urlencoded_tuple("grant_type", "authorization_code")
                .x_www_form_urlencoded_tuple("redirect_uri", "http://localhost:5173")
                .x_www_form_urlencoded_tuple("code", "4/abc");
            then.status(200).json_body(json!({
                "access_token": "ya29.token",
                "expires_in": 3599,
                "token_type": "Bearer"
            }));
        });

        let token = client_for(&server)
            .exchange_code_for_token("4/abc")
            .await
            .expect("token");

        mock.assert_hits(1);
        assert_eq!(token.secret(), "ya29.token");
    }

    #[tokio::test]
    async fn invalid_grant_is_rejection() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/token");
            then.status(400).json_body(json!({
                "error": "invalid_grant",
                "error_description": "Bad Request"
            }));
        });

        let err = client_for(&server)
            .exchange_code_for_token("stale")
            .await
            .expect_err("rejected");

        assert!(matches!(err, ExchangeError::ProviderRejected { .. }));
        assert_eq!(err.public_message(), "Bad Request");
    }

    #[tokio::test]
    async fn fetch_profile_maps_userinfo() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/v1/userinfo")
                .header("authorization", "Bearer ya29.token");
            then.status(200).json_body(json!({
                "sub": "123",
                "name": "Grace",
                "email": "grace@example.com",
                "picture": "http://pic"
            }));
        });

        let profile = client_for(&server)
            .fetch_profile(&AccessToken::new("ya29.token"))
            .await
            .expect("profile");

        assert_eq!(profile.name, "Grace");
        assert_eq!(profile.email, "grace@example.com");
        assert_eq!(profile.image_url, "http://pic");
    }

    #[tokio::test]
    async fn unreadable_userinfo_keeps_body_for_diagnostics() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/userinfo");
            then.status(200).body("<html>maintenance</html>");
        });

        let err = client_for(&server)
            .fetch_profile(&AccessToken::new("ya29.token"))
            .await
            .expect_err("invalid body");

        match err {
            ExchangeError::InvalidResponse { ref body, .. } => {
                assert_eq!(body, "<html>maintenance</html>")
            }
            ref other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.details().unwrap().contains("maintenance"));
    }

    #[tokio::test]
    async fn userinfo_failure_keeps_status_and_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/userinfo");
            then.status(401).body(r#"{"error":"invalid_token"}"#);
        });

        let err = client_for(&server)
            .fetch_profile(&AccessToken::new("expired"))
            .await
            .expect_err("unauthorized");

        assert!(matches!(
            err,
            ExchangeError::UpstreamStatus { status: 401, ref body, .. } if body.contains("invalid_token")
        ));
    }
}
