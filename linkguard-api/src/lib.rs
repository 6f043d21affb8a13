//! # LinkGuard API
//!
//! Request surface for link inspection: a typed action router, an axum HTTP
//! server in front of it, and a retrying client for talking to that server.
//!
//! ## Endpoints
//!
//! - `POST /api/v1/actions` - Dispatch a tagged action (`inspectAllLinks`,
//!   `inspectSelectedLink`, `clearCache`, `getCacheStats`)
//! - `POST /api/v1/links/inspect` - Inspect the first links of a page
//! - `POST /api/v1/links/inspect-selected` - Inspect the selected link
//! - `POST /api/v1/cache/clear` - Clear the lookup cache
//! - `GET /api/v1/cache/stats` - Cache statistics
//! - `GET /health` - Liveness and configuration summary
//!
//! ## Example
//!
//! ```rust,ignore
//! use linkguard_api::{ApiConfig, ApiServer};
//!
//! let server = ApiServer::from_config(ApiConfig::from_env()).await?;
//! server.run(([127, 0, 0, 1], 3001)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod client;
mod dto;
mod error;
mod handlers;
mod router;
mod routes;
mod state;

pub use client::{ApiClient, RetryPolicy};
pub use dto::{
    ActionRequest, ActionResponse, CacheStatsResponse, ClearCacheResponse, HealthResponse,
    InspectRequest, SelectedLinkResponse,
};
pub use error::ApiError;
pub use router::RequestRouter;
pub use routes::create_router;
pub use state::{ApiConfig, AppState};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use linkguard_core::error::Result;

/// API server for LinkGuard.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a server over prepared state.
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Builds state from `config`, loading the cache snapshot.
    pub async fn from_config(config: ApiConfig) -> Result<Self> {
        Ok(Self::new(AppState::initialize(config).await?))
    }

    /// Returns the shared state.
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Creates the router with all routes configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("LinkGuard API server listening on {}", addr);

        axum::serve(listener, self.router()).await
    }
}
