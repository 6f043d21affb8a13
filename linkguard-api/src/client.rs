//! HTTP client for a running inspection service.
//!
//! Every request goes through a [`RetryPolicy`]. Only transport failures are
//! retried; once attempts run out the caller gets
//! [`LinkGuardError::ChannelUnavailable`].

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use linkguard_core::error::{LinkGuardError, Result};
use linkguard_core::types::PageSnapshot;
use linkguard_scanner::BatchVerdict;

use crate::dto::{
    ActionRequest, CacheStatsResponse, ClearCacheResponse, SelectedLinkResponse,
};

/// Bounded retry with a fixed pause between attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first included
    pub max_attempts: u32,
    /// Pause between attempts
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Runs `op` until it succeeds, fails with a non-transport error, or
    /// attempts run out.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.max_attempts.max(1);
        for attempt in 1..=attempts {
            match op().await {
                Ok(value) => return Ok(value),
                Err(LinkGuardError::HttpError(reason)) => {
                    warn!(attempt, max_attempts = attempts, %reason, "Request failed");
                    if attempt < attempts {
                        tokio::time::sleep(self.backoff).await;
                    }
                }
                Err(other) => return Err(other),
            }
        }
        Err(LinkGuardError::ChannelUnavailable { attempts })
    }
}

/// Client for the `/api/v1/actions` surface.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    policy: RetryPolicy,
}

impl ApiClient {
    /// Creates a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LinkGuardError::ConfigError(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            policy: RetryPolicy::default(),
        })
    }

    /// Replaces the retry policy.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Inspects a page's links.
    pub async fn inspect_all_links(&self, page: PageSnapshot) -> Result<BatchVerdict> {
        self.send(&ActionRequest::InspectAllLinks { page }).await
    }

    /// Inspects the selected link of a page.
    pub async fn inspect_selected_link(&self, page: PageSnapshot) -> Result<SelectedLinkResponse> {
        self.send(&ActionRequest::InspectSelectedLink { page }).await
    }

    /// Clears the service's cache.
    pub async fn clear_cache(&self) -> Result<ClearCacheResponse> {
        self.send(&ActionRequest::ClearCache).await
    }

    /// Fetches the service's cache statistics.
    pub async fn cache_stats(&self) -> Result<CacheStatsResponse> {
        self.send(&ActionRequest::GetCacheStats).await
    }

    /// Sends one action and decodes the typed response.
    pub async fn send<R: DeserializeOwned>(&self, request: &ActionRequest) -> Result<R> {
        let url = format!("{}/api/v1/actions", self.base_url);
        debug!(action = request.name(), %url, "Sending action");

        let (http, url) = (&self.http, url.as_str());
        self.policy
            .run(move || async move {
                let response = http
                    .post(url)
                    .json(request)
                    .send()
                    .await
                    .map_err(|e| LinkGuardError::HttpError(e.to_string()))?;

                let status = response.status();
                if !status.is_success() {
                    let text = response.text().await.unwrap_or_default();
                    return Err(LinkGuardError::InternalError(format!(
                        "service returned HTTP {}: {}",
                        status, text
                    )));
                }

                response
                    .json::<R>()
                    .await
                    .map_err(|e| LinkGuardError::InternalError(format!("invalid response body: {}", e)))
            })
            .await
    }
}
