pub mod auth;
pub mod health;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Builds the relay's routes with tracing and a CORS policy that admits only
/// the configured frontend origin. Rate limiting is layered on by the binary,
/// since it needs the peer address.
pub fn build_router(state: AppState) -> Result<Router, axum::http::header::InvalidHeaderValue> {
    let cors = CorsLayer::new()
        .allow_origin(state.config.server.frontend_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);

    Ok(Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/{provider}/callback", post(auth::oauth_callback))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}
