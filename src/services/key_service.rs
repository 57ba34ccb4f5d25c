//! Key service - license key generation, listing, and verification.
//!
//! Keys are generated in batches against an existing software record, listed
//! joined with their software for the admin UI, and checked on the public
//! verification endpoint.
//!
//! # Code Format
//!
//! Three dash-separated groups of uppercase alphanumerics, lengths 4-4-3,
//! e.g. `AB12-CD34-EFG`. Each character is drawn independently and uniformly
//! from a 36-symbol alphabet. Generated codes are not checked for collisions
//! against existing records; at ~36^11 possible codes the residual collision
//! probability is accepted.

use chrono::{Duration, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        license_key::{KeyWithSoftware, LicenseKey},
        software::Software,
    },
    store::Store,
};

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_GROUPS: [usize; 3] = [4, 4, 3];

/// The outcome of checking a submitted code.
#[derive(Debug)]
pub enum VerifyOutcome {
    /// The key is redeemable; carries the download payload.
    Valid {
        software: Option<Software>,
        valid_until: Option<chrono::DateTime<Utc>>,
    },
    /// The key's redemption flag is set.
    AlreadyUsed,
    /// The key's expiry has passed.
    Expired,
}

/// Generate one license code.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    let groups: Vec<String> = CODE_GROUPS
        .iter()
        .map(|&len| {
            (0..len)
                .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
                .collect()
        })
        .collect();
    groups.join("-")
}

/// Generate a batch of keys for a software record.
///
/// `validity_days`, when supplied and non-zero, sets each key's expiry to
/// now plus that many days; otherwise the keys never expire. The whole
/// batch is appended and persisted in one rewrite.
///
/// # Errors
///
/// - `InvalidRequest`: `count` is zero or negative
/// - `SoftwareNotFound`: no software record with this id
pub async fn generate_keys(
    store: &Store,
    software_id: Uuid,
    count: i64,
    validity_days: Option<i64>,
) -> Result<Vec<LicenseKey>, AppError> {
    if count <= 0 {
        return Err(AppError::InvalidRequest(
            "count must be a positive integer".to_string(),
        ));
    }
    if store.find_software(software_id).await?.is_none() {
        return Err(AppError::SoftwareNotFound);
    }

    let valid_until = validity_days
        .filter(|days| *days != 0)
        .map(|days| Utc::now() + Duration::days(days));

    let batch: Vec<LicenseKey> = (0..count)
        .map(|_| LicenseKey::new(generate_code(), software_id, valid_until))
        .collect();

    let appended = batch.clone();
    store
        .update_keys(move |keys| {
            keys.extend(batch);
            Ok(())
        })
        .await?;

    tracing::info!(software_id = %software_id, count = appended.len(), "keys generated");
    Ok(appended)
}

/// List all keys joined with their software records, in storage order.
///
/// A left join: `software` is `None` for a dangling reference. Storage read
/// failures degrade to an empty list, logged.
pub async fn list_keys(store: &Store) -> Vec<KeyWithSoftware> {
    let keys = match store.read_keys().await {
        Ok(keys) => keys,
        Err(e) => {
            tracing::warn!(error = %e, "key collection unreadable, listing as empty");
            return Vec::new();
        }
    };
    let software = match store.read_software().await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "software collection unreadable, join yields null");
            Vec::new()
        }
    };

    keys.into_iter()
        .map(|key| {
            let joined = software.iter().find(|s| s.id == key.software_id).cloned();
            KeyWithSoftware {
                key,
                software: joined,
            }
        })
        .collect()
}

/// Delete a single key.
///
/// # Errors
///
/// - `KeyNotFound`: no key with this id (no write happens)
pub async fn delete_key(store: &Store, id: Uuid) -> Result<(), AppError> {
    store
        .update_keys(move |keys| {
            let before = keys.len();
            keys.retain(|k| k.id != id);
            if keys.len() == before {
                return Err(AppError::KeyNotFound);
            }
            Ok(())
        })
        .await?;

    tracing::info!(id = %id, "key deleted");
    Ok(())
}

/// Check a submitted code.
///
/// The input is trimmed and matched exactly. Verification never mutates the
/// ledger; the `used` flag is only read, so an unexpired key verifies
/// repeatedly until it is deleted.
///
/// # Errors
///
/// - `CodeNotFound`: no key carries this code
pub async fn verify_code(store: &Store, code: &str) -> Result<VerifyOutcome, AppError> {
    let code = code.trim();
    let key = store
        .read_keys()
        .await?
        .into_iter()
        .find(|k| k.code == code)
        .ok_or(AppError::CodeNotFound)?;

    if key.used {
        return Ok(VerifyOutcome::AlreadyUsed);
    }
    if let Some(valid_until) = key.valid_until
        && valid_until < Utc::now()
    {
        return Ok(VerifyOutcome::Expired);
    }

    let software = store.find_software(key.software_id).await?;
    Ok(VerifyOutcome::Valid {
        software,
        valid_until: key.valid_until,
    })
}
