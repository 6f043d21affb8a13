//! Action dispatch shared by every request surface.

use std::sync::Arc;

use tracing::instrument;

use linkguard_core::traits::LinkSource;
use linkguard_scanner::{BatchVerdict, LinkAnalyzer};

use crate::dto::{
    ActionRequest, ActionResponse, CacheStatsResponse, ClearCacheResponse, SelectedLinkResponse,
};

/// Routes UI actions to the analyzer and cache. Every request gets exactly
/// one response.
pub struct RequestRouter {
    analyzer: Arc<LinkAnalyzer>,
}

impl RequestRouter {
    /// Creates a router over a shared analyzer.
    pub fn new(analyzer: Arc<LinkAnalyzer>) -> Self {
        Self { analyzer }
    }

    /// Returns the analyzer.
    pub fn analyzer(&self) -> &Arc<LinkAnalyzer> {
        &self.analyzer
    }

    /// Handles one action.
    #[instrument(skip_all, fields(action = request.name()))]
    pub async fn dispatch(&self, request: ActionRequest) -> ActionResponse {
        match request {
            ActionRequest::InspectAllLinks { page } => {
                ActionResponse::Links(self.inspect_all_links(&page).await)
            }
            ActionRequest::InspectSelectedLink { page } => {
                ActionResponse::Selected(self.inspect_selected_link(&page).await)
            }
            ActionRequest::ClearCache => ActionResponse::Cleared(self.clear_cache().await),
            ActionRequest::GetCacheStats => ActionResponse::Stats(self.cache_stats()),
        }
    }

    /// Inspects the links listed by `source`.
    pub async fn inspect_all_links(&self, source: &(impl LinkSource + Sync)) -> BatchVerdict {
        self.analyzer.inspect_links(&source.list_links()).await
    }

    /// Inspects the link selected in `source`.
    pub async fn inspect_selected_link(&self, source: &(impl LinkSource + Sync)) -> SelectedLinkResponse {
        match source.selected_link() {
            Some(link) => self.analyzer.analyze(&link.href).await.into(),
            None => SelectedLinkResponse::no_selection(),
        }
    }

    /// Clears the lookup cache.
    pub async fn clear_cache(&self) -> ClearCacheResponse {
        let cache = self.analyzer.cache();
        cache.clear().await;

        ClearCacheResponse {
            success: true,
            message: "Cache cleared successfully".into(),
            stats: cache.stats(),
        }
    }

    /// Reports cache statistics.
    pub fn cache_stats(&self) -> CacheStatsResponse {
        CacheStatsResponse {
            success: true,
            stats: self.analyzer.cache().stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use linkguard_cache::{MemoryStore, ThreatCache};
    use linkguard_core::error::Result;
    use linkguard_core::traits::ThreatLookup;
    use linkguard_core::types::{CacheStats, Link, PageSnapshot, ThreatResult};

    struct CleanLookup;

    #[async_trait]
    impl ThreatLookup for CleanLookup {
        async fn lookup(&self, _url: &str) -> Result<ThreatResult> {
            Ok(ThreatResult::clean())
        }
    }

    fn router() -> RequestRouter {
        let cache = Arc::new(ThreatCache::new(Arc::new(MemoryStore::new())));
        RequestRouter::new(Arc::new(LinkAnalyzer::new(cache, Arc::new(CleanLookup))))
    }

    #[tokio::test]
    async fn test_selected_link_verdict() {
        let page = PageSnapshot::default().with_selection(Link::new("http://bit.ly/abc"));
        let response = router()
            .dispatch(ActionRequest::InspectSelectedLink { page })
            .await;

        match response {
            ActionResponse::Selected(selected) => {
                assert!(!selected.safe);
                assert!(selected.message.contains("Risk Score: 1/7"));
                assert!(selected.details.is_some());
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_selection() {
        let response = router()
            .inspect_selected_link(&PageSnapshot::new(vec![Link::new("https://example.com/")]))
            .await;
        assert_eq!(response, SelectedLinkResponse::no_selection());
    }

    #[tokio::test]
    async fn test_inspect_all_then_clear() {
        let router = router();
        let page = PageSnapshot::new(vec![
            Link::new("https://example.com/"),
            Link::new("https://example.org/"),
        ]);

        let verdict = router.inspect_all_links(&page).await;
        assert!(verdict.safe);
        assert_eq!(router.cache_stats().stats.total_entries, 2);

        let cleared = router.clear_cache().await;
        assert!(cleared.success);
        assert_eq!(cleared.message, "Cache cleared successfully");
        assert_eq!(
            cleared.stats,
            CacheStats {
                max_entries: 1000,
                ..CacheStats::default()
            }
        );
    }

    #[tokio::test]
    async fn test_empty_page() {
        let response = router()
            .dispatch(ActionRequest::InspectAllLinks {
                page: PageSnapshot::default(),
            })
            .await;
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["safe"], true);
        assert_eq!(json["message"], "No links found on this page.");
    }
}
