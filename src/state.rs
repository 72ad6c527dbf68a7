use std::sync::Arc;

use crate::config::Config;
use crate::models::provider::OauthProvider;
use crate::services::oauth::service::OAuthProviderService;

/// Shared, read-only relay state. Nothing here changes after startup, so
/// concurrent exchanges never coordinate.
#[derive(Clone)]
pub struct AppState {
    pub github_oauth: Arc<dyn OAuthProviderService>,
    pub google_oauth: Option<Arc<dyn OAuthProviderService>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn oauth_service(&self, provider: OauthProvider) -> Option<Arc<dyn OAuthProviderService>> {
        match provider {
            OauthProvider::Github => Some(self.github_oauth.clone()),
            OauthProvider::Google => self.google_oauth.clone(),
        }
    }

    /// Secret to scrub from anything returned for `provider`.
    pub fn client_secret(&self, provider: OauthProvider) -> &str {
        match provider {
            OauthProvider::Github => &self.config.oauth.github.client_secret,
            OauthProvider::Google => self
                .config
                .oauth
                .google
                .as_ref()
                .map(|google| google.client_secret.as_str())
                .unwrap_or(""),
        }
    }
}
