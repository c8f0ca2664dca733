use thiserror::Error;

use super::{store::StoreError, token::TokenDecodeError};
use crate::client::ApiError;

/// Why a login or registration did not go through.
///
/// All variants are recoverable: the form keeps its input and the session
/// keeps whatever state it had before the attempt.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The credentials failed local validation.
    #[error("{0}")]
    InvalidInput(String),

    /// The server refused the request.
    #[error("{0}")]
    Rejected(String),

    /// The server could not be reached or answered unintelligibly.
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a token the client cannot read.
    #[error("Received an unreadable token: {0}")]
    InvalidToken(#[from] TokenDecodeError),

    /// The token could not be persisted.
    #[error("Could not persist session: {0}")]
    Storage(#[from] StoreError),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { message, .. } => AuthError::Rejected(message),
            ApiError::Network(msg) => AuthError::Network(msg),
            ApiError::Decode(msg) => AuthError::Network(format!("invalid response: {}", msg)),
        }
    }
}
