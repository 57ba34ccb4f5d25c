//! Token service - issuing and validating bearer tokens.
//!
//! Tokens are HS256-signed JWTs carrying the administrator's username and a
//! 24-hour expiry. The signing secret comes from configuration and is turned
//! into key material once at startup; there is no refresh or revocation,
//! expiry is purely time-based.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Token lifetime.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Signing and verification key material, built once from the configured
/// secret and shared through application state.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Claims embedded in issued tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the administrator username
    pub sub: String,
    /// Issued at (unix timestamp)
    pub iat: i64,
    /// Expiry (unix timestamp)
    pub exp: i64,
}

/// Issue a signed token bound to the given identity.
pub fn issue(keys: &TokenKeys, username: &str) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: username.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };
    encode(&Header::default(), &claims, &keys.encoding)
        .map_err(|e| AppError::Storage(anyhow::Error::new(e).context("failed to sign token")))
}

/// Validate a token and return its claims.
///
/// # Errors
///
/// - `Forbidden`: the token is malformed, carries a bad signature, or has
///   expired
pub fn authenticate(keys: &TokenKeys, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(token, &keys.decoding, &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| AppError::Forbidden)
}
