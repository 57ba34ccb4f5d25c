//! Administrator account model and authentication request/response types.
//!
//! There is exactly one administrator record, persisted as a single JSON
//! object in `user.json`. It is created at first boot and only ever mutated
//! by the change-password operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The singleton administrator record.
///
/// # Password Storage
///
/// `password_hash` is an opaque `salt:hash` string where both parts are
/// hex-encoded. The salt is 16 random bytes; the hash is derived with
/// PBKDF2-HMAC-SHA512 (see `services::credential_service`). The plaintext
/// password is never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    /// Login name, fixed to one record
    pub username: String,

    /// Salted password hash in `salt:hash` form (hex-encoded)
    pub password_hash: String,

    /// Timestamp of the last password change (or creation)
    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /api/login`.
///
/// Both fields are optional at the serde level so a missing field surfaces
/// as a 400 validation error instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Signed bearer token, valid for 24 hours
    pub token: String,
}

/// Request body for `POST /api/change-password`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}
