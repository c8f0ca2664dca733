use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried in the middle segment of an admin token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The admin the token was issued to. Opaque to the client: any string
    /// subject the server signs is accepted.
    pub id: String,
    /// Expiration instant, seconds since the epoch.
    pub exp: i64,
    /// Issuance instant, seconds since the epoch.
    pub iat: i64,
}

impl Claims {
    /// Expiration instant in milliseconds since the epoch.
    pub fn expires_at_millis(&self) -> i64 {
        self.exp.saturating_mul(1000)
    }

    /// Whether the token is still inside its validity window at `now_millis`.
    pub fn is_live_at(&self, now_millis: i64) -> bool {
        self.expires_at_millis() > now_millis
    }
}

/// Why a stored token could not be read as a set of claims.
///
/// Never surfaced to the user: every variant degrades to "not authenticated".
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenDecodeError {
    #[error("token must have three dot-separated segments, found {0}")]
    Segments(usize),

    #[error("token payload is not valid base64")]
    Base64,

    #[error("token payload is not a claims object: {0}")]
    Claims(String),
}

/// Reads the claims out of a compact three-segment token without checking
/// its signature.
///
/// The signature belongs to the server; the client only needs the validity
/// window and the subject.
pub fn decode_claims(token: &str) -> Result<Claims, TokenDecodeError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(TokenDecodeError::Segments(segments.len()));
    }

    let payload = segments[1].trim_end_matches('=');
    let bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| general_purpose::STANDARD_NO_PAD.decode(payload))
        .map_err(|_| TokenDecodeError::Base64)?;

    serde_json::from_slice::<Claims>(&bytes).map_err(|e| TokenDecodeError::Claims(e.to_string()))
}
