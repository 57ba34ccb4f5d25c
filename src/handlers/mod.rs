//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Delegates to a service for the actual work
//! 3. Returns HTTP response (JSON, status code)

/// Login and password rotation endpoints
pub mod auth;
/// Service health endpoint
pub mod health;
/// License key endpoints, including the public verification route
pub mod keys;
/// Software catalog endpoints
pub mod software;
