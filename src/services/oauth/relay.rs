use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::{errors::ExchangeError, service::OAuthProviderService};

/// Body of `POST /api/{provider}/callback`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ExchangeRequest {
    #[serde(default)]
    pub code: Option<String>,
}

impl ExchangeRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
        }
    }
}

/// The only thing a successful exchange hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeResponse {
    pub access_token: String,
}

/// Trades an authorization code for an access token through `service`.
///
/// An absent or blank code is refused before any outbound call. Otherwise the
/// provider is called exactly once; a failed exchange is never retried since
/// the code may already have been consumed.
pub async fn exchange_code(
    service: &dyn OAuthProviderService,
    request: ExchangeRequest,
) -> Result<ExchangeResponse, ExchangeError> {
    let code = match request.code {
        Some(code) if !code.trim().is_empty() => code,
        _ => return Err(ExchangeError::MissingCode),
    };

    let provider = service.provider();

    match service.exchange_code_for_token(&code).await {
        Ok(token) => {
            info!(%provider, "authorization code exchanged");
            Ok(ExchangeResponse {
                access_token: token.into_secret(),
            })
        }
        Err(err) if err.is_server_error() => {
            error!(%provider, details = ?err.details(), "{} OAuth error: {}", provider, err);
            Err(err)
        }
        Err(err) => {
            warn!(%provider, "{} OAuth error: {}", provider, err);
            Err(err)
        }
    }
}
