use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::{
    models::provider::OauthProvider,
    responses::ErrorResponse,
    services::oauth::{
        errors::ExchangeError,
        relay::{exchange_code, ExchangeRequest},
    },
    state::AppState,
};

/// `POST /api/{provider}/callback` with `{code}`. Answers `{access_token}` or
/// `{error, details?}`; the client secret never appears in either.
pub async fn oauth_callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    payload: Result<Json<ExchangeRequest>, JsonRejection>,
) -> Response {
    let provider = match provider.parse::<OauthProvider>() {
        Ok(provider) => provider,
        Err(name) => return unsupported(name),
    };

    let service = match state.oauth_service(provider) {
        Some(service) => service,
        None => return unsupported(provider.slug().to_string()),
    };

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(%provider, %rejection, "unreadable callback body");
            ExchangeRequest::default()
        }
    };

    match exchange_code(service.as_ref(), request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => {
            ErrorResponse::from_exchange_error(&err, state.client_secret(provider)).into_response()
        }
    }
}

fn unsupported(name: String) -> Response {
    let err = ExchangeError::UnsupportedProvider(name);
    ErrorResponse::not_found(&err.public_message()).into_response()
}
