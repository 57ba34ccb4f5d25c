//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Storage Errors**: Reading or writing the backing JSON documents failed
/// - **Authentication Errors**: Missing credentials or an invalid token
/// - **Resource Errors**: Requested software, key, or code not found
/// - **Validation Errors**: Missing or empty request fields
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A storage document could not be read, parsed, or written.
    ///
    /// This wraps any `anyhow::Error` from the store using the `#[from]`
    /// attribute. Returns HTTP 500 with a generic message; the detail is
    /// logged server-side only.
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    /// Login or change-password attempted with a wrong username or password.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// No bearer token was supplied on a protected route.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("No authentication token provided")]
    Unauthenticated,

    /// A bearer token was supplied but is malformed, unsigned, or expired.
    ///
    /// Returns HTTP 403 Forbidden.
    #[error("Invalid or expired token")]
    Forbidden,

    /// Requested software record does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Software not found")]
    SoftwareNotFound,

    /// Requested license key record does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Key not found")]
    KeyNotFound,

    /// A submitted key code matched no record.
    ///
    /// Returns HTTP 404 Not Found with `valid: false` in the body so the
    /// public verification page can render it directly.
    #[error("Key code not found")]
    CodeNotFound,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON with a human-readable message:
/// ```json
/// { "message": "Software not found" }
/// ```
///
/// # Status Code Mapping
///
/// - `InvalidRequest` → 400 Bad Request
/// - `InvalidCredentials`, `Unauthenticated` → 401 Unauthorized
/// - `Forbidden` → 403 Forbidden
/// - `SoftwareNotFound`, `KeyNotFound`, `CodeNotFound` → 404 Not Found
/// - `Storage` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // The verification endpoint's failure bodies carry a `valid` flag
        // in addition to the message.
        if let AppError::CodeNotFound = self {
            let body = Json(json!({ "valid": false, "message": self.to_string() }));
            return (StatusCode::NOT_FOUND, body).into_response();
        }

        let (status, message) = match self {
            AppError::InvalidRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InvalidCredentials | AppError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AppError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::SoftwareNotFound | AppError::KeyNotFound | AppError::CodeNotFound => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::Storage(ref e) => {
                tracing::error!(error = %e, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "message": message }));

        (status, body).into_response()
    }
}
