use std::sync::Arc;

use reqwest::Url;
use tracing::{info, warn};

use super::{
    redirect::{github_authorize_url, take_code, CallbackOutcome},
    relay_client::TokenRelay,
    ClientConfig, LoginError,
};
use crate::models::{profile::Profile, provider::OauthProvider};
use crate::services::oauth::{google::id_token::profile_from_credential, service::ProfileFetcher};
use crate::session::{clear_profiles, persist_profile, restore_profile, ProfileStore};

/// The signed-in state of one client. A failed attempt records a message and
/// keeps whatever user was already there.
pub struct LoginSession {
    relay: Arc<dyn TokenRelay>,
    github_profiles: Arc<dyn ProfileFetcher>,
    store: Arc<dyn ProfileStore>,
    user: Option<Profile>,
    error: Option<String>,
}

impl LoginSession {
    pub fn new(
        relay: Arc<dyn TokenRelay>,
        github_profiles: Arc<dyn ProfileFetcher>,
        store: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            relay,
            github_profiles,
            store,
            user: None,
            error: None,
        }
    }

    pub fn user(&self) -> Option<&Profile> {
        self.user.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Picks up a profile saved by an earlier run.
    pub fn restore(&mut self) -> Option<&Profile> {
        self.user = restore_profile(self.store.as_ref());
        self.user.as_ref()
    }

    pub fn github_login_url(config: &ClientConfig) -> Result<Url, LoginError> {
        github_authorize_url(
            &config.github_authorize_url,
            &config.github_client_id,
            &config.redirect_uri,
        )
    }

    pub fn sign_in_with_google(&mut self, credential: &str) -> Result<&Profile, LoginError> {
        let result = profile_from_credential(credential).map_err(LoginError::Google);
        self.finish(OauthProvider::Google, result)
    }

    /// Exchanges `code` through the relay, then fetches the GitHub user with
    /// the returned token.
    pub async fn sign_in_with_github(&mut self, code: &str) -> Result<&Profile, LoginError> {
        let result = self.fetch_github_profile(code).await;
        self.finish(OauthProvider::Github, result)
    }

    /// Handles the page GitHub redirected back to. Returns the cleaned URL the
    /// caller should show instead; a URL without a code is left signed-in as is.
    pub async fn handle_redirect(
        &mut self,
        current_url: &Url,
    ) -> Result<CallbackOutcome, LoginError> {
        let outcome = take_code(current_url);
        if let Some(code) = &outcome.code {
            self.sign_in_with_github(code).await?;
        }
        Ok(outcome)
    }

    pub fn logout(&mut self) -> Result<(), LoginError> {
        clear_profiles(self.store.as_ref())?;
        self.user = None;
        self.error = None;
        info!("signed out");
        Ok(())
    }

    async fn fetch_github_profile(&self, code: &str) -> Result<Profile, LoginError> {
        let token = self.relay.exchange(OauthProvider::Github, code).await?;
        Ok(self.github_profiles.fetch_profile(&token).await?)
    }

    fn finish(
        &mut self,
        provider: OauthProvider,
        result: Result<Profile, LoginError>,
    ) -> Result<&Profile, LoginError> {
        match result {
            Ok(profile) => {
                // Local storage is best effort; the login itself succeeded.
                if let Err(err) = persist_profile(self.store.as_ref(), &profile) {
                    warn!(%err, %provider, "could not save profile locally");
                }
                info!(%provider, name = %profile.name, "signed in");
                self.error = None;
                let user: &Profile = self.user.insert(profile);
                Ok(user)
            }
            Err(err) => {
                warn!(%err, %provider, "login failed");
                self.error = Some(err.user_message());
                Err(err)
            }
        }
    }
}
