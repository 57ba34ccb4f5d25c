//! License key models and API request/response types.
//!
//! A license key is a short formatted code a user redeems on the public
//! verification endpoint for the download links of one software record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::software::Software;

/// A license key record, stored as an element of the `keys.json` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseKey {
    /// Unique identifier
    pub id: Uuid,

    /// Formatted license code, `XXXX-XXXX-XXX` over `A-Z0-9`
    pub code: String,

    /// The software record this key unlocks. Must exist at creation time;
    /// not re-validated afterwards.
    pub software_id: Uuid,

    /// Redemption flag. Present in the schema but never set by any
    /// operation; verification reports "already used" if it is ever true.
    #[serde(default)]
    pub used: bool,

    /// Timestamp when the key was generated
    pub created_at: DateTime<Utc>,

    /// Expiry timestamp; `null` means the key never expires
    pub valid_until: Option<DateTime<Utc>>,
}

impl LicenseKey {
    /// Build a new unused key with a fresh id and creation timestamp.
    pub fn new(code: String, software_id: Uuid, valid_until: Option<DateTime<Utc>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            code,
            software_id,
            used: false,
            created_at: Utc::now(),
            valid_until,
        }
    }
}

/// Request body for `POST /api/keys` (batch generation).
///
/// ```json
/// {
///   "softwareId": "550e8400-e29b-41d4-a716-446655440000",
///   "count": 10,
///   "validityDays": 30
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateKeysRequest {
    /// Software record the keys will unlock
    pub software_id: Option<Uuid>,

    /// Number of keys to generate, must be positive
    #[serde(default)]
    pub count: i64,

    /// Days until expiry; omitted or zero means no expiry
    pub validity_days: Option<i64>,
}

/// Response body for a successful batch generation.
#[derive(Debug, Serialize)]
pub struct GenerateKeysResponse {
    pub keys: Vec<LicenseKey>,
}

/// A key joined with its software record for the admin listing.
///
/// `software` is `null` when the reference dangles, which can only happen
/// transiently since software deletion cascades to its keys.
#[derive(Debug, Serialize)]
pub struct KeyWithSoftware {
    #[serde(flatten)]
    pub key: LicenseKey,
    pub software: Option<Software>,
}

/// Request body for the public `POST /api/verify-key` endpoint.
#[derive(Debug, Deserialize)]
pub struct VerifyKeyRequest {
    #[serde(default)]
    pub code: String,
}

/// Response body for the public verification endpoint.
///
/// On success carries the software record (with download URLs) and the
/// key's expiry so the caller can render a download page. `validUntil` is
/// serialized as `null` for keys that never expire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyKeyResponse {
    pub valid: bool,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub software: Option<Software>,

    pub valid_until: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired: Option<bool>,
}

impl VerifyKeyResponse {
    /// Successful verification: the caller gets the download payload.
    pub fn valid(software: Option<Software>, valid_until: Option<DateTime<Utc>>) -> Self {
        Self {
            valid: true,
            message: "Key verified successfully".to_string(),
            software,
            valid_until,
            expired: None,
        }
    }

    /// Failed verification with a human-readable reason.
    pub fn invalid(message: &str) -> Self {
        Self {
            valid: false,
            message: message.to_string(),
            software: None,
            valid_until: None,
            expired: None,
        }
    }

    /// Failed verification because the key's expiry has passed.
    pub fn expired(message: &str) -> Self {
        Self {
            expired: Some(true),
            ..Self::invalid(message)
        }
    }
}
