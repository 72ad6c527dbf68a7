use std::time::Duration;

use reqwest::Client;

pub mod errors;
pub mod github;
pub mod google;
pub mod relay;
pub mod service;
pub mod token;

/// User agent sent on every provider call; GitHub rejects API requests without one.
pub const USER_AGENT: &str = concat!("login-relay/", env!("CARGO_PKG_VERSION"));

/// Shared client for all provider calls. The timeout is explicit because an
/// authorization code is single-use and requests are never retried.
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}
