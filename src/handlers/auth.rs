//! Authentication HTTP handlers.
//!
//! This module implements the account-related API endpoints:
//! - POST /api/login - Exchange credentials for a bearer token
//! - POST /api/change-password - Rotate the administrator password

use crate::{
    AppState,
    error::AppError,
    middleware::auth::AuthContext,
    models::{
        MessageResponse,
        user::{ChangePasswordRequest, LoginRequest, LoginResponse},
    },
    services::{credential_service, token_service},
};
use axum::{Extension, Json, extract::State};

/// Log in as the administrator.
///
/// # Endpoint
///
/// `POST /api/login` (public)
///
/// # Request Body
///
/// ```json
/// { "username": "admin", "password": "..." }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{ "token": "<bearer token>" }`, valid 24 hours
/// - **Error (400)**: username or password missing
/// - **Error (401)**: credentials do not match the stored record
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (Some(username), Some(password)) = (request.username, request.password) else {
        return Err(AppError::InvalidRequest(
            "username and password are required".to_string(),
        ));
    };
    if username.is_empty() || password.is_empty() {
        return Err(AppError::InvalidRequest(
            "username and password are required".to_string(),
        ));
    }

    let user = credential_service::login(&state.store, &username, &password).await?;
    let token = token_service::issue(&state.tokens, &user.username)?;

    tracing::info!(username = %user.username, "administrator logged in");
    Ok(Json(LoginResponse { token }))
}

/// Rotate the administrator password.
///
/// # Endpoint
///
/// `POST /api/change-password` (bearer)
///
/// # Request Body
///
/// ```json
/// { "currentPassword": "...", "newPassword": "..." }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{ "message": "Password updated" }`
/// - **Error (400)**: a field is missing or empty
/// - **Error (401)**: the current password does not verify
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let (Some(current), Some(new)) = (request.current_password, request.new_password) else {
        return Err(AppError::InvalidRequest(
            "currentPassword and newPassword are required".to_string(),
        ));
    };
    if current.is_empty() || new.is_empty() {
        return Err(AppError::InvalidRequest(
            "currentPassword and newPassword are required".to_string(),
        ));
    }

    credential_service::change_password(&state.store, &current, &new).await?;

    tracing::info!(username = %auth.username, "administrator password rotated");
    Ok(Json(MessageResponse::new("Password updated")))
}
