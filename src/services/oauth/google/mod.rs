pub mod client;
pub mod errors;
pub mod id_token;
#[cfg(test)]
pub mod mock_google_oauth;
