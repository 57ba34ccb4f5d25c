//! License Key Service
//!
//! This is a REST API server for distributing software download links behind
//! license keys. Administrators manage software records and generate keys;
//! end users redeem a key on a public endpoint and receive the download URLs.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Storage**: JSON documents rewritten as complete snapshots
//! - **Authentication**: single admin account, HS256 bearer tokens
//! - **Format**: JSON requests/responses

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::Config, services::credential_service, services::token_service::TokenKeys, store::Store};

/// Shared application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub tokens: TokenKeys,
}

/// Initialize storage and build the application state.
///
/// Opens the data directory, seeds the collection documents, creates the
/// administrator record at first boot, and derives the token key material
/// from the configured secret. Safe to call on every start.
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let store = Arc::new(Store::open(&config.data_dir)?);
    credential_service::bootstrap(&store, config).await?;

    Ok(AppState {
        store,
        tokens: TokenKeys::from_secret(&config.token_secret),
    })
}

/// Build the HTTP router.
///
/// Protected routes sit behind the bearer-token middleware; the login,
/// verification, and health routes are public.
pub fn router(state: AppState) -> Router {
    // Routes requiring a valid bearer token
    let protected_routes = Router::new()
        .route("/api/change-password", post(handlers::auth::change_password))
        // Software catalog routes
        .route("/api/software", get(handlers::software::list_software))
        .route("/api/software", post(handlers::software::create_software))
        .route("/api/software/{id}", put(handlers::software::update_software))
        .route(
            "/api/software/{id}",
            delete(handlers::software::delete_software),
        )
        // Key ledger routes
        .route("/api/keys", get(handlers::keys::list_keys))
        .route("/api/keys", post(handlers::keys::generate_keys))
        .route("/api/keys/{id}", delete(handlers::keys::delete_key))
        // Apply authentication middleware to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    Router::new()
        // Public routes (no authentication required)
        .route("/health", get(handlers::health::health_check))
        .route("/api/login", post(handlers::auth::login))
        .route("/api/verify-key", post(handlers::keys::verify_key))
        // Merge authenticated routes
        .merge(protected_routes)
        // Browser admin UI and download page call from another origin
        .layer(CorsLayer::permissive())
        // Add request tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share state with all handlers via State extraction
        .with_state(state)
}
