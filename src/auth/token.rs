//! Signed session tokens (HS256 JWT).

use crate::config::Config;
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id the token is bound to.
    pub id: String,
    /// Issued at (unix seconds).
    pub iat: u64,
    /// Expiry (unix seconds).
    pub exp: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Signing secret is not configured")]
    MissingSecret,

    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Issues and verifies session tokens with a single process-wide secret.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expires_in_secs: u64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"[REDACTED]")
            .field("expires_in_secs", &self.expires_in_secs)
            .finish()
    }
}

impl TokenIssuer {
    pub fn new(secret: &str, expires_in_secs: u64) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expires_in_secs,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, TokenError> {
        Self::new(&config.jwt_secret, config.jwt_expires_in_secs)
    }

    pub fn expires_in_secs(&self) -> u64 {
        self.expires_in_secs
    }

    /// Issue a token for `user_id`, valid from now for the configured lifetime.
    pub fn issue(&self, user_id: &str) -> Result<String, TokenError> {
        let now = Utc::now().timestamp().max(0) as u64;
        self.issue_at(user_id, now)
    }

    /// Issue a token as if it had been created at `issued_at`.
    pub fn issue_at(&self, user_id: &str, issued_at: u64) -> Result<String, TokenError> {
        let claims = Claims {
            id: user_id.to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(self.expires_in_secs),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Check signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}
