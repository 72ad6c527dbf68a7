use std::env;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
pub const DEFAULT_GITHUB_USER_URL: &str = "https://api.github.com/user";
pub const DEFAULT_GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_GOOGLE_USER_INFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Credentials and endpoints for one OAuth provider. Loaded once at startup and
/// handed to the provider client; never read from the environment per request.
#[derive(Clone)]
pub struct OAuthProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub token_url: String,
    pub user_info_url: String,
}

impl std::fmt::Debug for OAuthProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthProviderConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("redirect_uri", &self.redirect_uri)
            .field("token_url", &self.token_url)
            .field("user_info_url", &self.user_info_url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct OAuthSettings {
    pub github: OAuthProviderConfig,
    /// Only present when a Google client secret is configured; the Google
    /// identity-token path works without it.
    pub google: Option<OAuthProviderConfig>,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub frontend_origin: String,
    pub environment: String,
    pub http_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerSettings,
    pub oauth: OAuthSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok(); // Load .env file

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let frontend_origin = get("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.into());
        let redirect_uri = get("REDIRECT_URI").unwrap_or_else(|| frontend_origin.clone());

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get("OAUTH_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "OAUTH_HTTP_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let github = OAuthProviderConfig {
            client_id: required("GITHUB_CLIENT_ID")?,
            client_secret: required("GITHUB_CLIENT_SECRET")?,
            redirect_uri: redirect_uri.clone(),
            token_url: get("GITHUB_OAUTH_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_TOKEN_URL.into()),
            user_info_url: get("GITHUB_USER_URL").unwrap_or_else(|| DEFAULT_GITHUB_USER_URL.into()),
        };

        let google = match get("GOOGLE_CLIENT_SECRET") {
            Some(client_secret) => Some(OAuthProviderConfig {
                client_id: required("GOOGLE_CLIENT_ID")?,
                client_secret,
                redirect_uri: get("GOOGLE_REDIRECT_URI").unwrap_or(redirect_uri),
                token_url: get("GOOGLE_OAUTH_TOKEN_URL")
                    .unwrap_or_else(|| DEFAULT_GOOGLE_TOKEN_URL.into()),
                user_info_url: get("GOOGLE_USER_INFO_URL")
                    .unwrap_or_else(|| DEFAULT_GOOGLE_USER_INFO_URL.into()),
            }),
            None => None,
        };

        let environment = get("APP_ENV")
            .or_else(|| get("NODE_ENV"))
            .unwrap_or_else(|| "development".into());

        Ok(Config {
            server: ServerSettings {
                host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
                port,
                frontend_origin,
                environment,
                http_timeout: Duration::from_secs(timeout_secs),
            },
            oauth: OAuthSettings { github, google },
        })
    }
}

/// Relay config with fake credentials, for handler and state tests.
#[cfg(test)]
pub(crate) fn test_config() -> std::sync::Arc<Config> {
    let vars = [
        ("GITHUB_CLIENT_ID", "gh-client-id"),
        ("GITHUB_CLIENT_SECRET", "gh-secret-value"),
        ("FRONTEND_URL", "http://localhost:5173"),
    ];
    let config = Config::from_lookup(|key| {
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    })
    .expect("test config");
    std::sync::Arc::new(config)
}
