//! License key HTTP handlers.
//!
//! This module implements the key-related API endpoints:
//! - GET /api/keys - List keys joined with their software
//! - POST /api/keys - Generate a batch of keys
//! - DELETE /api/keys/:id - Delete a single key
//! - POST /api/verify-key - Public redemption check

use crate::{
    AppState,
    error::AppError,
    models::{
        MessageResponse,
        license_key::{
            GenerateKeysRequest, GenerateKeysResponse, KeyWithSoftware, VerifyKeyRequest,
            VerifyKeyResponse,
        },
    },
    services::key_service::{self, VerifyOutcome},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// List all keys, each joined with its software record.
///
/// # Endpoint
///
/// `GET /api/keys` (bearer)
///
/// `software` is `null` for a dangling reference. Ordering matches storage
/// order; an unreadable collection is reported as empty.
pub async fn list_keys(State(state): State<AppState>) -> Json<Vec<KeyWithSoftware>> {
    Json(key_service::list_keys(&state.store).await)
}

/// Generate a batch of license keys.
///
/// # Endpoint
///
/// `POST /api/keys` (bearer)
///
/// # Request Body
///
/// ```json
/// { "softwareId": "550e8400-...", "count": 10, "validityDays": 30 }
/// ```
///
/// `validityDays` is optional; omitted or zero generates keys that never
/// expire.
///
/// # Response
///
/// - **Success (201 Created)**: `{ "keys": [...] }` with the new records
/// - **Error (400)**: missing `softwareId` or non-positive `count`
/// - **Error (404)**: `softwareId` matches no software record
pub async fn generate_keys(
    State(state): State<AppState>,
    Json(request): Json<GenerateKeysRequest>,
) -> Result<(StatusCode, Json<GenerateKeysResponse>), AppError> {
    let software_id = request.software_id.ok_or_else(|| {
        AppError::InvalidRequest("softwareId is required".to_string())
    })?;

    let keys = key_service::generate_keys(
        &state.store,
        software_id,
        request.count,
        request.validity_days,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(GenerateKeysResponse { keys })))
}

/// Delete a single license key.
///
/// # Endpoint
///
/// `DELETE /api/keys/{id}` (bearer)
///
/// # Response
///
/// - **Success (200 OK)**: `{ "message": "Key deleted" }`
/// - **Error (404)**: no key with this id
pub async fn delete_key(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    key_service::delete_key(&state.store, id).await?;
    Ok(Json(MessageResponse::new("Key deleted")))
}

/// Check a license code and return the download payload.
///
/// # Endpoint
///
/// `POST /api/verify-key` (public, no authentication)
///
/// # Request Body
///
/// ```json
/// { "code": "AB12-CD34-EFG" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{ "valid": true, "message": "...",
///   "software": {...}, "validUntil": "..." | null }`
/// - **Error (400)**: empty code, already-used key, or expired key
///   (expired responses additionally carry `"expired": true`)
/// - **Error (404)**: unknown code
///
/// All failure bodies carry `valid: false` so the public page can render
/// them without inspecting the status code. This check never marks the key
/// as used; an unexpired key verifies repeatedly until deleted.
pub async fn verify_key(
    State(state): State<AppState>,
    Json(request): Json<VerifyKeyRequest>,
) -> Result<Response, AppError> {
    let code = request.code.trim();
    if code.is_empty() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(VerifyKeyResponse::invalid("A key code is required")),
        )
            .into_response());
    }

    let response = match key_service::verify_code(&state.store, code).await? {
        VerifyOutcome::Valid {
            software,
            valid_until,
        } => Json(VerifyKeyResponse::valid(software, valid_until)).into_response(),
        VerifyOutcome::AlreadyUsed => (
            StatusCode::BAD_REQUEST,
            Json(VerifyKeyResponse::invalid("This key has already been used")),
        )
            .into_response(),
        VerifyOutcome::Expired => (
            StatusCode::BAD_REQUEST,
            Json(VerifyKeyResponse::expired("This key has expired")),
        )
            .into_response(),
    };
    Ok(response)
}
