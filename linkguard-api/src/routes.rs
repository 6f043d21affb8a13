//! API route configuration.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers;
use crate::state::AppState;

/// Upper bound on request bodies; page snapshots are small.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // Tagged actions
        .route("/api/v1/actions", post(handlers::dispatch_action))

        // Link inspection
        .route("/api/v1/links/inspect", post(handlers::inspect_links))
        .route("/api/v1/links/inspect-selected", post(handlers::inspect_selected))

        // Cache
        .route("/api/v1/cache/clear", post(handlers::clear_cache))
        .route("/api/v1/cache/stats", get(handlers::cache_stats))

        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}
