use async_trait::async_trait;

use super::{errors::ExchangeError, token::AccessToken};
use crate::models::{profile::Profile, provider::OauthProvider};

/// Looks up the user behind an access token and normalizes the result.
#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    async fn fetch_profile(&self, token: &AccessToken) -> Result<Profile, ExchangeError>;
}

/// Everything the relay needs from a provider. Real clients talk HTTP; tests
/// substitute the mocks.
#[async_trait]
pub trait OAuthProviderService: ProfileFetcher {
    fn provider(&self) -> OauthProvider;

    /// Makes exactly one request to the token endpoint. Codes are single-use,
    /// so implementations must not retry.
    async fn exchange_code_for_token(&self, code: &str) -> Result<AccessToken, ExchangeError>;
}
