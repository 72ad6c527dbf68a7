//! Client side of the login flow: building the GitHub authorize link, reading
//! the code back off the redirect, trading it through the relay and keeping the
//! resulting profile in local storage.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::config::{ConfigError, DEFAULT_FRONTEND_URL, DEFAULT_GITHUB_USER_URL};
use crate::services::oauth::{errors::ExchangeError, google::errors::GoogleAuthError};
use crate::session::StoreError;

pub mod flow;
pub mod redirect;
pub mod relay_client;

pub use flow::LoginSession;

pub const DEFAULT_RELAY_URL: &str = "http://localhost:3001";
pub const DEFAULT_GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
pub const DEFAULT_PROFILE_STORE_PATH: &str = ".login-profile.json";

pub const GOOGLE_LOGIN_FAILED: &str = "Failed to decode Google token";
/// Google's sign-in widget gave up before handing over a credential.
pub const GOOGLE_SIGN_IN_FAILED: &str = "Google Login Failed";
pub const GITHUB_LOGIN_FAILED: &str = "GitHub login failed. Make sure backend is running.";

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Google login failed: {0}")]
    Google(#[source] GoogleAuthError),
    #[error(transparent)]
    Relay(#[from] relay_client::RelayClientError),
    #[error(transparent)]
    Profile(#[from] ExchangeError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

impl LoginError {
    /// Text shown to the person logging in. Relay rejections carry their own
    /// message; anything else on the GitHub path collapses to one generic line.
    pub fn user_message(&self) -> String {
        match self {
            LoginError::Google(GoogleAuthError::MissingCredential) => {
                GOOGLE_SIGN_IN_FAILED.to_string()
            }
            LoginError::Google(_) => GOOGLE_LOGIN_FAILED.to_string(),
            LoginError::Relay(relay_client::RelayClientError::Rejected { message, .. }) => {
                message.clone()
            }
            LoginError::Relay(_) | LoginError::Profile(_) => GITHUB_LOGIN_FAILED.to_string(),
            other => other.to_string(),
        }
    }
}

/// Settings for the `login` binary. None of these are secrets; the client
/// secret only ever lives on the relay.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub github_client_id: String,
    pub redirect_uri: String,
    pub relay_url: String,
    pub github_authorize_url: String,
    pub github_user_url: String,
    pub profile_store_path: PathBuf,
    pub http_timeout: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let http_timeout = match get("OAUTH_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "OAUTH_HTTP_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
            None => Duration::from_secs(crate::config::DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(ClientConfig {
            github_client_id: get("GITHUB_CLIENT_ID")
                .ok_or(ConfigError::Missing("GITHUB_CLIENT_ID"))?,
            redirect_uri: get("REDIRECT_URI").unwrap_or_else(|| DEFAULT_FRONTEND_URL.into()),
            relay_url: get("RELAY_URL")
                .unwrap_or_else(|| DEFAULT_RELAY_URL.into())
                .trim_end_matches('/')
                .to_string(),
            github_authorize_url: get("GITHUB_AUTHORIZE_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_AUTHORIZE_URL.into()),
            github_user_url: get("GITHUB_USER_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_USER_URL.into()),
            profile_store_path: get("PROFILE_STORE_PATH")
                .unwrap_or_else(|| DEFAULT_PROFILE_STORE_PATH.into())
                .into(),
            http_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::relay_client::RelayClientError;
    use super::*;
    use crate::models::provider::OauthProvider;

    #[test]
    fn client_config_defaults() {
        let config = ClientConfig::from_lookup(|key| {
            (key == "GITHUB_CLIENT_ID").then(|| "gh-id".to_string())
        })
        .unwrap();

        assert_eq!(config.relay_url, DEFAULT_RELAY_URL);
        assert_eq!(config.redirect_uri, DEFAULT_FRONTEND_URL);
        assert_eq!(config.github_authorize_url, DEFAULT_GITHUB_AUTHORIZE_URL);
        assert_eq!(
            config.profile_store_path,
            PathBuf::from(DEFAULT_PROFILE_STORE_PATH)
        );
    }

    #[test]
    fn client_config_requires_client_id_and_trims_relay_url() {
        let err = ClientConfig::from_lookup(|_| None).unwrap_err();
        assert_eq!(err, ConfigError::Missing("GITHUB_CLIENT_ID"));

        let config = ClientConfig::from_lookup(|key| match key {
            "GITHUB_CLIENT_ID" => Some("gh-id".into()),
            "RELAY_URL" => Some("http://relay.local:8080/".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.relay_url, "http://relay.local:8080");
    }

    #[test]
    fn user_messages() {
        let rejected = LoginError::Relay(RelayClientError::Rejected {
            status: 400,
            message: "bad_verification_code".into(),
        });
        assert_eq!(rejected.user_message(), "bad_verification_code");

        let profile = LoginError::Profile(ExchangeError::MissingAccessToken {
            provider: OauthProvider::Github,
        });
        assert_eq!(profile.user_message(), GITHUB_LOGIN_FAILED);

        let no_credential = LoginError::Google(GoogleAuthError::MissingCredential);
        assert_eq!(no_credential.user_message(), GOOGLE_SIGN_IN_FAILED);

        let undecodable = LoginError::Google(GoogleAuthError::InvalidIdToken(
            jsonwebtoken::errors::ErrorKind::InvalidToken.into(),
        ));
        assert_eq!(undecodable.user_message(), GOOGLE_LOGIN_FAILED);
    }
}
