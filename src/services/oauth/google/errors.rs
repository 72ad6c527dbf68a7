use thiserror::Error;

#[derive(Debug, Error)]
pub enum GoogleAuthError {
    #[error("Google credential is missing")]
    MissingCredential,
    #[error("Failed to decode Google token: {0}")]
    InvalidIdToken(#[from] jsonwebtoken::errors::Error),
}
