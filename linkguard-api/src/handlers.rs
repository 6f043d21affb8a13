//! API route handlers.

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::debug;

use linkguard_core::types::PageSnapshot;
use linkguard_scanner::BatchVerdict;

use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// POST /api/v1/actions
pub async fn dispatch_action(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ActionRequest>, JsonRejection>,
) -> Result<Json<ActionResponse>> {
    let Json(request) = payload?;
    debug!(action = request.name(), "Dispatching action");
    Ok(Json(state.router.dispatch(request).await))
}

/// POST /api/v1/links/inspect
pub async fn inspect_links(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<InspectRequest>, JsonRejection>,
) -> Result<Json<BatchVerdict>> {
    let Json(req) = payload?;
    let page = PageSnapshot::from(req);
    Ok(Json(state.router.inspect_all_links(&page).await))
}

/// POST /api/v1/links/inspect-selected
pub async fn inspect_selected(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<InspectRequest>, JsonRejection>,
) -> Result<Json<SelectedLinkResponse>> {
    let Json(req) = payload?;
    let page = PageSnapshot::from(req);
    Ok(Json(state.router.inspect_selected_link(&page).await))
}

/// POST /api/v1/cache/clear
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> Json<ClearCacheResponse> {
    Json(state.router.clear_cache().await)
}

/// GET /api/v1/cache/stats
pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStatsResponse> {
    Json(state.router.cache_stats())
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: state.uptime_seconds(),
        cache_entries: state.router.analyzer().cache().len(),
        lookup_enabled: state.config.lookup_enabled(),
    })
}
