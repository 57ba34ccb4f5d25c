//! Credential service - administrator password hashing and verification.
//!
//! This service owns the singleton administrator record:
//! - Salted password hashing (PBKDF2-HMAC-SHA512)
//! - Login verification
//! - Password rotation
//! - First-boot bootstrap of the default account
//!
//! # Hash Format
//!
//! Stored hashes look like `salt:hash` where both parts are hex-encoded.
//! The salt is 16 random bytes; the hash is 64 bytes of PBKDF2 output at
//! 1000 iterations. Verification re-derives with the stored salt and
//! compares in constant time.

use chrono::Utc;
use constant_time_eq::constant_time_eq;
use sha2::Sha512;

use crate::{config::Config, error::AppError, models::user::AdminUser, store::Store};

const SALT_LEN: usize = 16;
const PBKDF2_ROUNDS: u32 = 1000;
const HASH_LEN: usize = 64;

/// Hash a password with a fresh random salt.
///
/// # Output
///
/// `hex(salt):hex(hash)`, 32 + 1 + 128 characters.
pub fn hash_password(password: &str) -> String {
    let salt: [u8; SALT_LEN] = rand::random();
    let mut hash = [0u8; HASH_LEN];
    pbkdf2::pbkdf2_hmac::<Sha512>(password.as_bytes(), &salt, PBKDF2_ROUNDS, &mut hash);
    format!("{}:{}", hex::encode(salt), hex::encode(hash))
}

/// Verify a password against a stored `salt:hash` string.
///
/// Re-derives the hash with the stored salt and compares in constant time.
/// A malformed stored value verifies as false rather than erroring.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, hash_hex)) = stored.split_once(':') else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(hash_hex)) else {
        return false;
    };
    if expected.len() != HASH_LEN {
        return false;
    }
    let mut derived = [0u8; HASH_LEN];
    pbkdf2::pbkdf2_hmac::<Sha512>(password.as_bytes(), &salt, PBKDF2_ROUNDS, &mut derived);
    constant_time_eq(&derived, &expected)
}

/// Create the administrator record at first boot if none exists.
///
/// Idempotent: an existing record is never reset, so a redeployment keeps
/// the rotated password. The configured defaults are insecure and meant to
/// be overridden in real deployments.
pub async fn bootstrap(store: &Store, config: &Config) -> Result<(), AppError> {
    store
        .update_user(|user| {
            if user.is_none() {
                tracing::info!(
                    username = %config.admin_username,
                    "creating default administrator account"
                );
                *user = Some(AdminUser {
                    username: config.admin_username.clone(),
                    password_hash: hash_password(&config.admin_password),
                    updated_at: Utc::now(),
                });
            }
            Ok(())
        })
        .await
}

/// Verify a username/password pair against the stored record.
///
/// # Errors
///
/// - `InvalidCredentials`: no record exists, the username differs, or the
///   derived hash does not match
pub async fn login(store: &Store, username: &str, password: &str) -> Result<AdminUser, AppError> {
    let user = store
        .read_user()
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if user.username != username || !verify_password(password, &user.password_hash) {
        return Err(AppError::InvalidCredentials);
    }
    Ok(user)
}

/// Replace the administrator password.
///
/// # Errors
///
/// - `InvalidCredentials`: `current` does not verify against the stored hash
pub async fn change_password(store: &Store, current: &str, new: &str) -> Result<(), AppError> {
    store
        .update_user(|user| {
            let user = user.as_mut().ok_or(AppError::InvalidCredentials)?;
            if !verify_password(current, &user.password_hash) {
                return Err(AppError::InvalidCredentials);
            }
            user.password_hash = hash_password(new);
            user.updated_at = Utc::now();
            Ok(())
        })
        .await
}
