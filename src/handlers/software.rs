//! Software catalog HTTP handlers.
//!
//! This module implements the software-related API endpoints:
//! - GET /api/software - List all software records
//! - POST /api/software - Create a new record
//! - PUT /api/software/:id - Update a record
//! - DELETE /api/software/:id - Delete a record (cascades to its keys)

use crate::{
    AppState,
    error::AppError,
    models::{
        MessageResponse,
        software::{Software, SoftwareRequest},
    },
    services::catalog_service,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

/// List all software records in storage order.
///
/// # Endpoint
///
/// `GET /api/software` (bearer)
///
/// An unreadable collection is reported as empty rather than an error.
pub async fn list_software(State(state): State<AppState>) -> Json<Vec<Software>> {
    Json(catalog_service::list_software(&state.store).await)
}

/// Create a new software record.
///
/// # Endpoint
///
/// `POST /api/software` (bearer)
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Tool",
///   "fileType": "single",
///   "downloadUrls": ["https://example.com/tool.zip"]
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: the created record with server-assigned
///   `id` and `createdAt`
/// - **Error (400)**: a required field is missing or empty
pub async fn create_software(
    State(state): State<AppState>,
    Json(request): Json<SoftwareRequest>,
) -> Result<(StatusCode, Json<Software>), AppError> {
    let software = catalog_service::create_software(&state.store, request).await?;
    Ok((StatusCode::CREATED, Json(software)))
}

/// Update an existing software record.
///
/// # Endpoint
///
/// `PUT /api/software/{id}` (bearer)
///
/// Same body and validation as create. Preserves `id` and `createdAt`,
/// stamps `updatedAt`.
///
/// # Response
///
/// - **Success (200 OK)**: the updated record
/// - **Error (400)**: validation failure
/// - **Error (404)**: no record with this id
pub async fn update_software(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SoftwareRequest>,
) -> Result<Json<Software>, AppError> {
    let software = catalog_service::update_software(&state.store, id, request).await?;
    Ok(Json(software))
}

/// Delete a software record and every key referencing it.
///
/// # Endpoint
///
/// `DELETE /api/software/{id}` (bearer)
///
/// # Response
///
/// - **Success (200 OK)**: `{ "message": "Software deleted" }`
/// - **Error (404)**: no record with this id
/// - **Error (500)**: a document rewrite failed; state may be partially
///   applied and callers should re-list to confirm
pub async fn delete_software(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    catalog_service::delete_software(&state.store, id).await?;
    Ok(Json(MessageResponse::new("Software deleted")))
}
