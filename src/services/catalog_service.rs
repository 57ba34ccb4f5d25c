//! Catalog service - software record management.
//!
//! Create, list, update, and delete for the software collection. Deletion
//! cascades to the key ledger: every key referencing the deleted record is
//! removed in the same locked section.

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::software::{Software, SoftwareRequest},
    store::Store,
};

/// Presence validation shared by create and update.
fn validate(request: &SoftwareRequest) -> Result<(), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::InvalidRequest("name is required".to_string()));
    }
    if request.file_type.trim().is_empty() {
        return Err(AppError::InvalidRequest("fileType is required".to_string()));
    }
    if request.download_urls.is_empty() {
        return Err(AppError::InvalidRequest(
            "at least one download URL is required".to_string(),
        ));
    }
    Ok(())
}

/// List all software records in storage order.
///
/// A storage read failure degrades to an empty list instead of erroring;
/// the failure is logged.
pub async fn list_software(store: &Store) -> Vec<Software> {
    match store.read_software().await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "software collection unreadable, listing as empty");
            Vec::new()
        }
    }
}

/// Create a new software record.
///
/// # Errors
///
/// - `InvalidRequest`: name, file type, or download URLs missing/empty
pub async fn create_software(
    store: &Store,
    request: SoftwareRequest,
) -> Result<Software, AppError> {
    validate(&request)?;

    let software = Software::new(request.name, request.file_type, request.download_urls);
    let created = software.clone();
    store
        .update_software(move |items| {
            items.push(software);
            Ok(())
        })
        .await?;

    tracing::info!(id = %created.id, name = %created.name, "software created");
    Ok(created)
}

/// Update an existing software record in place.
///
/// Replaces name, file type, and download URLs; preserves id and creation
/// timestamp; stamps `updatedAt`.
///
/// # Errors
///
/// - `InvalidRequest`: same validation as create
/// - `SoftwareNotFound`: no record with this id
pub async fn update_software(
    store: &Store,
    id: Uuid,
    request: SoftwareRequest,
) -> Result<Software, AppError> {
    validate(&request)?;

    store
        .update_software(move |items| {
            let item = items
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or(AppError::SoftwareNotFound)?;
            item.name = request.name;
            item.file_type = request.file_type;
            item.download_urls = request.download_urls;
            item.updated_at = Some(Utc::now());
            Ok(item.clone())
        })
        .await
}

/// Delete a software record and cascade to its keys.
///
/// Both documents are rewritten under their locks in one logical operation.
/// If either rewrite fails the error is reported and nothing is rolled back.
///
/// # Errors
///
/// - `SoftwareNotFound`: no record with this id (no write happens)
pub async fn delete_software(store: &Store, id: Uuid) -> Result<(), AppError> {
    let removed_keys = store
        .update_software_and_keys(move |software, keys| {
            let before = software.len();
            software.retain(|s| s.id != id);
            if software.len() == before {
                return Err(AppError::SoftwareNotFound);
            }
            let keys_before = keys.len();
            keys.retain(|k| k.software_id != id);
            Ok(keys_before - keys.len())
        })
        .await?;

    tracing::info!(id = %id, cascaded_keys = removed_keys, "software deleted");
    Ok(())
}
