use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::models::{profile::Profile, provider::OauthProvider};
use crate::services::oauth::{
    errors::ExchangeError,
    service::{OAuthProviderService, ProfileFetcher},
    token::AccessToken,
};

/// What the mocked token endpoint does when asked to exchange a code.
#[derive(Debug, Clone)]
pub enum MockExchange {
    Token(String),
    Rejected {
        error: String,
        description: Option<String>,
    },
    NoToken,
    NetworkDown,
}

impl Default for MockExchange {
    fn default() -> Self {
        MockExchange::Token("mock-access-token".into())
    }
}

#[derive(Default)]
pub struct MockGitHubOAuth {
    pub exchange: MockExchange,
    pub profile: Option<Profile>,
    pub exchange_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
}

impl MockGitHubOAuth {
    pub fn with_exchange(exchange: MockExchange) -> Self {
        Self {
            exchange,
            ..Default::default()
        }
    }

    pub fn exchange_calls(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }

    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }
}

pub fn mock_exchange_result(
    provider: OauthProvider,
    exchange: &MockExchange,
) -> Result<AccessToken, ExchangeError> {
    match exchange {
        MockExchange::Token(token) => Ok(AccessToken::new(token.clone())),
        MockExchange::Rejected { error, description } => Err(ExchangeError::ProviderRejected {
            provider,
            error: error.clone(),
            description: description.clone(),
        }),
        MockExchange::NoToken => Err(ExchangeError::MissingAccessToken { provider }),
        MockExchange::NetworkDown => Err(ExchangeError::Transport {
            provider,
            message: "error sending request: connection refused".into(),
        }),
    }
}

#[async_trait]
impl OAuthProviderService for MockGitHubOAuth {
    fn provider(&self) -> OauthProvider {
        OauthProvider::Github
    }

    async fn exchange_code_for_token(&self, _code: &str) -> Result<AccessToken, ExchangeError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        mock_exchange_result(OauthProvider::Github, &self.exchange)
    }
}

#[async_trait]
impl ProfileFetcher for MockGitHubOAuth {
    async fn fetch_profile(&self, _token: &AccessToken) -> Result<Profile, ExchangeError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.profile.clone().ok_or(ExchangeError::UpstreamStatus {
            provider: OauthProvider::Github,
            status: 401,
            body: r#"{"message":"Bad credentials"}"#.into(),
        })
    }
}
