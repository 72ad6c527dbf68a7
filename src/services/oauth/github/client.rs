// services/oauth/github/client.rs

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client};
use tracing::debug;

use crate::config::OAuthProviderConfig;
use crate::models::{
    profile::{GitHubUser, Profile},
    provider::OauthProvider,
};
use crate::services::oauth::{
    errors::ExchangeError,
    service::{OAuthProviderService, ProfileFetcher},
    token::{interpret_token_response, AccessToken},
};

const PROVIDER: OauthProvider = OauthProvider::Github;

/// Relay-side client: holds the client secret and can exchange codes.
#[derive(Clone)]
pub struct GitHubOAuthClient {
    client: Client,
    config: OAuthProviderConfig,
    profiles: GitHubProfileClient,
}

impl GitHubOAuthClient {
    pub fn new(client: Client, config: OAuthProviderConfig) -> Self {
        let profiles = GitHubProfileClient::new(client.clone(), config.user_info_url.clone());
        Self {
            client,
            config,
            profiles,
        }
    }
}

/// Bearer-authenticated `GET /user`. Needs no client credentials, so the
/// login flow uses it directly with the token the relay handed back.
#[derive(Clone)]
pub struct GitHubProfileClient {
    client: Client,
    user_info_url: String,
}

impl GitHubProfileClient {
    pub fn new(client: Client, user_info_url: impl Into<String>) -> Self {
        Self {
            client,
            user_info_url: user_info_url.into(),
        }
    }
}

#[async_trait]
impl ProfileFetcher for GitHubOAuthClient {
    async fn fetch_profile(&self, token: &AccessToken) -> Result<Profile, ExchangeError> {
        self.profiles.fetch_profile(token).await
    }
}

#[async_trait]
impl OAuthProviderService for GitHubOAuthClient {
    fn provider(&self) -> OauthProvider {
        PROVIDER
    }

    async fn exchange_code_for_token(&self, code: &str) -> Result<AccessToken, ExchangeError> {
        debug!(token_url = %self.config.token_url, "exchanging GitHub authorization code");

        let res = self
            .client
            .post(&self.config.token_url)
            .header(ACCEPT, "application/json") // GitHub answers form-encoded otherwise
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
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
impl ProfileFetcher for GitHubProfileClient {
    async fn fetch_profile(&self, token: &AccessToken) -> Result<Profile, ExchangeError> {
        let res = self
            .client
            .get(&self.user_info_url)
            .bearer_auth(token.secret())
            .header(ACCEPT, "application/vnd.github+json")
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

        let user: GitHubUser =
            serde_json::from_str(&body).map_err(|err| ExchangeError::InvalidResponse {
                provider: PROVIDER,
                message: err.to_string(),
                body,
            })?;

        Ok(Profile::from(user))
    }
}
