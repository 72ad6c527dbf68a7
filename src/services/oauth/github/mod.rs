pub mod client;
#[cfg(test)]
pub mod mock_github_oauth;
