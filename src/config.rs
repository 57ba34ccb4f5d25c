//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.
//!
//! The token signing secret and the bootstrap admin credentials live here so
//! they are injected once at startup instead of hiding in module globals.

use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATA_DIR` (optional): directory holding the JSON documents, defaults to `./data`
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `TOKEN_SECRET` (optional): HMAC secret for signing bearer tokens
/// - `ADMIN_USERNAME` / `ADMIN_PASSWORD` (optional): credentials for the
///   administrator record created at first boot
///
/// # Security
///
/// The defaults for `TOKEN_SECRET` and the admin credentials are insecure and
/// exist only so a fresh checkout runs out of the box. Real deployments must
/// override all three and rotate the admin password after first login.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_token_secret")]
    pub token_secret: String,

    #[serde(default = "default_admin_username")]
    pub admin_username: String,

    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

/// Default storage directory if DATA_DIR is not set.
fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_token_secret() -> String {
    "keyvend-development-secret-change-me".to_string()
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "password".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable values cannot be parsed into
    /// expected types.
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Parse environment variables into Config struct
        // Field names are automatically converted: data_dir -> DATA_DIR
        envy::from_env::<Config>()
    }
}
