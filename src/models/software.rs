//! Software catalog models and API request/response types.
//!
//! This module defines:
//! - `Software`: catalog entry describing a downloadable product
//! - `SoftwareRequest`: request body shared by create and update
//!
//! All wire names are camelCase to match the JSON contract consumed by the
//! admin UI and the public download page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog entry describing a downloadable product and its URLs.
///
/// Stored as an element of the `software.json` array. Deleting a record
/// cascades: every license key referencing it is removed in the same
/// logical operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Software {
    /// Unique identifier, assigned at creation, immutable
    pub id: Uuid,

    /// Human-readable product name
    pub name: String,

    /// Label describing how the download links are rendered,
    /// e.g. `"single"` or `"multiple"` (multi-part archives)
    pub file_type: String,

    /// Ordered download URLs, at least one
    pub download_urls: Vec<String>,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last edit; absent until the record is updated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Software {
    /// Build a new record with a fresh id and creation timestamp.
    pub fn new(name: String, file_type: String, download_urls: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            file_type,
            download_urls,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// Request body for creating or updating a software record.
///
/// # Validation
///
/// All three fields are required and must be non-empty. Fields default to
/// empty when missing so validation can report 400 instead of the extractor
/// rejecting the body.
///
/// ```json
/// {
///   "name": "Tool",
///   "fileType": "single",
///   "downloadUrls": ["https://example.com/tool.zip"]
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareRequest {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub file_type: String,

    #[serde(default)]
    pub download_urls: Vec<String>,
}
