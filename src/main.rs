use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::{anyhow, Context, Result};
use axum::response::IntoResponse;
use tokio::net::TcpListener;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tracing::info;

use login_relay::config::Config;
use login_relay::responses::ErrorResponse;
use login_relay::routes::build_router;
use login_relay::services::oauth::{
    build_http_client, github::client::GitHubOAuthClient, google::client::GoogleOAuthClient,
    service::OAuthProviderService,
};
use login_relay::state::AppState;
use login_relay::utils::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Arc::new(Config::from_env().context("invalid relay configuration")?);
    init_tracing("login_relay=info,tower_http=info");

    let http_client =
        build_http_client(config.server.http_timeout).context("failed to build HTTP client")?;

    let github_oauth = Arc::new(GitHubOAuthClient::new(
        http_client.clone(),
        config.oauth.github.clone(),
    )) as Arc<dyn OAuthProviderService>;
    let google_oauth = config.oauth.google.clone().map(|google| {
        Arc::new(GoogleOAuthClient::new(http_client.clone(), google))
            as Arc<dyn OAuthProviderService>
    });

    let state = AppState {
        github_oauth,
        google_oauth,
        config: config.clone(),
    };

    let rate_limit_ms: u64 = env::var("RATE_LIMITER_MILLISECONDS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        // Default: 200ms/token (~5 req/sec)
        .unwrap_or(200);

    let rate_limit_burst: u32 = env::var("RATE_LIMITER_BURST")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(20);

    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(rate_limit_ms)
            .burst_size(rate_limit_burst)
            .use_headers()
            .error_handler(|_err| {
                ErrorResponse::too_many_requests(
                    "Too many requests. Please wait a moment and try again.",
                )
                .into_response()
            })
            .finish()
            .ok_or_else(|| anyhow!("rate limiter needs a non-zero period and burst"))?,
    );

    // Drop idle client IPs from the limiter map.
    let governor_limiter = governor_conf.limiter().clone();
    std::thread::spawn(move || loop {
        std::thread::sleep(Duration::from_secs(60));
        governor_limiter.retain_recent();
    });

    let app = build_router(state)
        .context("FRONTEND_URL is not a valid origin")?
        .layer(GovernorLayer {
            config: governor_conf,
        });

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server.host))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("Backend server running on http://{}", addr);
    info!(environment = %config.server.environment, "Environment");
    info!(frontend = %config.server.frontend_origin, "Frontend URL");
    info!(
        github = true,
        google = config.oauth.google.is_some(),
        "Code exchange enabled"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")?;

    Ok(())
}
