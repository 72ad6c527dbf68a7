use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::models::{profile::Profile, provider::OauthProvider};
use crate::services::oauth::{
    errors::ExchangeError,
    github::mock_github_oauth::{mock_exchange_result, MockExchange},
    service::{OAuthProviderService, ProfileFetcher},
    token::AccessToken,
};

#[derive(Default)]
pub struct MockGoogleOAuth {
    pub exchange: MockExchange,
    pub profile: Option<Profile>,
    pub exchange_calls: AtomicUsize,
}

impl MockGoogleOAuth {
    pub fn exchange_calls(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OAuthProviderService for MockGoogleOAuth {
    fn provider(&self) -> OauthProvider {
        OauthProvider::Google
    }

    async fn exchange_code_for_token(&self, _code: &str) -> Result<AccessToken, ExchangeError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        mock_exchange_result(OauthProvider::Google, &self.exchange)
    }
}

#[async_trait]
impl ProfileFetcher for MockGoogleOAuth {
    async fn fetch_profile(&self, _token: &AccessToken) -> Result<Profile, ExchangeError> {
        self.profile.clone().ok_or(ExchangeError::MissingAccessToken {
            provider: OauthProvider::Google,
        })
    }
}
