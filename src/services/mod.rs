//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They own validation, persistence access, and the verification rules.

pub mod catalog_service;
pub mod credential_service;
pub mod key_service;
pub mod token_service;
