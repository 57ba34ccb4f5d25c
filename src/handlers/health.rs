//! Health check endpoint for service monitoring.

use crate::{AppState, error::AppError};
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response.
///
/// Returns service status and storage accessibility.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Storage accessibility
    pub storage: String,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// # Checks
///
/// - Storage accessibility (loads the software document)
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "storage": "accessible",
///   "timestamp": "2025-12-21T19:00:00Z"
/// }
/// ```
///
/// If the data directory is unreadable, returns standard error response.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    // Verify the backing documents are readable
    state.store.read_software().await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        storage: "accessible".to_string(),
        timestamp: Utc::now(),
    }))
}
