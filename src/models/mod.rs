//! Data models representing persisted entities and API payloads.
//!
//! This module contains all data structures that map to the JSON documents
//! on disk, plus the request/response types of the HTTP API.

use serde::Serialize;

/// License key records and verification payloads
pub mod license_key;
/// Software catalog records
pub mod software;
/// Administrator account and login payloads
pub mod user;

/// Generic `{message}` response used by delete and change-password endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
