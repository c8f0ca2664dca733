use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// The claims the server signs into an admin token.
///
/// The wire shape is `{id, iat, exp}`. The client reads it back through
/// [`crate::session::decode_claims`], where `id` is just a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub id: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies admin tokens (HS256).
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenIssuer {
    /// Creates an issuer for `secret` with tokens valid for `ttl_secs`.
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.required_spec_claims = ["exp".to_string()].into_iter().collect();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_secs,
        }
    }

    /// Issues a token for `admin_id`, valid from now.
    pub fn issue(&self, admin_id: Uuid) -> Result<String> {
        let now = Utc::now().timestamp();
        self.issue_at(admin_id, now)
    }

    /// Issues a token as if it were `issued_at` (seconds since the epoch).
    pub fn issue_at(&self, admin_id: Uuid, issued_at: i64) -> Result<String> {
        let claims = AccessClaims {
            id: admin_id,
            iat: issued_at,
            exp: issued_at + self.ttl_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
    }

    /// Checks the signature and expiry of `token` and returns its claims.
    pub fn verify(&self, token: &str) -> Result<AccessClaims> {
        decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                AppError::Authentication("Invalid or expired token".to_string())
            })
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::decode_claims;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn issued_token_verifies_and_decodes_on_the_client() {
        let issuer = TokenIssuer::new(SECRET, 3600);
        let id = Uuid::new_v4();
        let token = issuer.issue(id).unwrap();

        let verified = issuer.verify(&token).unwrap();
        assert_eq!(verified.id, id);
        assert_eq!(verified.exp - verified.iat, 3600);

        let decoded = decode_claims(&token).unwrap();
        assert_eq!(decoded.id, verified.id.to_string());
        assert_eq!((decoded.iat, decoded.exp), (verified.iat, verified.exp));
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = TokenIssuer::new(SECRET, 60);
        let token = issuer.issue_at(Uuid::new_v4(), Utc::now().timestamp() - 3600).unwrap();
        assert!(matches!(issuer.verify(&token), Err(AppError::Authentication(_))));
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let token = TokenIssuer::new(b"another-secret-another-secret-xx", 60)
            .issue(Uuid::new_v4())
            .unwrap();
        assert!(TokenIssuer::new(SECRET, 60).verify(&token).is_err());
    }
}
