use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::warn;

use super::errors::ExchangeError;
use crate::models::provider::OauthProvider;

/// Bearer credential returned by a provider. Used once to fetch the profile.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        AccessToken(value.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }

    pub fn into_secret(self) -> String {
        self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([redacted])")
    }
}

/// Fields a token endpoint may send back. GitHub reports a bad code with a
/// 200 and an `error` field; Google uses a 400 with the same fields.
#[derive(Debug, Default, Deserialize)]
pub struct ProviderTokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

pub fn interpret_token_response(
    provider: OauthProvider,
    status: StatusCode,
    body: String,
) -> Result<AccessToken, ExchangeError> {
    let parsed = serde_json::from_str::<ProviderTokenResponse>(&body);

    if let Ok(ProviderTokenResponse {
        error: Some(error),
        error_description,
        ..
    }) = &parsed
    {
        if !error.trim().is_empty() {
            return Err(ExchangeError::ProviderRejected {
                provider,
                error: error.clone(),
                description: error_description.clone(),
            });
        }
    }

    if !status.is_success() {
        return Err(ExchangeError::UpstreamStatus {
            provider,
            status: status.as_u16(),
            body,
        });
    }

    match parsed {
        Ok(ProviderTokenResponse {
            access_token: Some(token),
            ..
        }) if !token.is_empty() => Ok(AccessToken::new(token)),
        Ok(_) => Err(ExchangeError::MissingAccessToken { provider }),
        // A successful status with an unreadable body carries no token either.
        Err(err) => {
            warn!(%provider, %err, %body, "token endpoint returned a non-JSON body");
            Err(ExchangeError::MissingAccessToken { provider })
        }
    }
}
