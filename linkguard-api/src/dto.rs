//! DTOs for API requests and responses.

use serde::{Deserialize, Serialize};

use linkguard_core::types::{CacheStats, Link, PageSnapshot, RiskVerdict, VerdictDetails};
use linkguard_scanner::BatchVerdict;

/// A request from a UI surface, tagged by `action`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ActionRequest {
    /// Inspect the first links of a page
    InspectAllLinks {
        /// Links captured by the page context
        #[serde(default)]
        page: PageSnapshot,
    },
    /// Inspect the link under the current selection
    InspectSelectedLink {
        /// Links and selection captured by the page context
        #[serde(default)]
        page: PageSnapshot,
    },
    /// Drop every cached lookup
    ClearCache,
    /// Report cache statistics
    GetCacheStats,
}

impl ActionRequest {
    /// Wire name of the action.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InspectAllLinks { .. } => "inspectAllLinks",
            Self::InspectSelectedLink { .. } => "inspectSelectedLink",
            Self::ClearCache => "clearCache",
            Self::GetCacheStats => "getCacheStats",
        }
    }
}

/// Verdict for the selected link.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectedLinkResponse {
    /// False when the link looks risky or could not be analyzed
    pub safe: bool,
    /// Explanation shown to the user
    pub message: String,
    /// Analysis details; absent when nothing was selected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<VerdictDetails>,
}

impl SelectedLinkResponse {
    /// Response for a page with no selected link.
    pub fn no_selection() -> Self {
        Self {
            safe: true,
            message: "No link selected. Please select a link on the page.".into(),
            details: None,
        }
    }
}

impl From<RiskVerdict> for SelectedLinkResponse {
    fn from(verdict: RiskVerdict) -> Self {
        Self {
            safe: verdict.safe,
            message: verdict.message,
            details: Some(verdict.details),
        }
    }
}

/// Response to `clearCache`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClearCacheResponse {
    /// Always true
    pub success: bool,
    /// Confirmation text
    pub message: String,
    /// Statistics after clearing
    pub stats: CacheStats,
}

/// Response to `getCacheStats`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheStatsResponse {
    /// Always true
    pub success: bool,
    /// Current statistics
    pub stats: CacheStats,
}

/// One response per action.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionResponse {
    /// Result of `inspectAllLinks`
    Links(BatchVerdict),
    /// Result of `inspectSelectedLink`
    Selected(SelectedLinkResponse),
    /// Result of `clearCache`
    Cleared(ClearCacheResponse),
    /// Result of `getCacheStats`
    Stats(CacheStatsResponse),
}

/// Request body for the inspect routes.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InspectRequest {
    /// Links in page order
    #[serde(default)]
    pub links: Vec<Link>,
    /// Selected link, if any
    #[serde(default)]
    pub selected: Option<Link>,
}

impl From<InspectRequest> for PageSnapshot {
    fn from(req: InspectRequest) -> Self {
        PageSnapshot {
            links: req.links,
            selected: req.selected,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Status
    pub status: String,
    /// Version
    pub version: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Entries currently cached
    pub cache_entries: usize,
    /// Whether Safe Browsing lookups are configured
    pub lookup_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_request_tags() {
        let req: ActionRequest = serde_json::from_value(json!({"action": "clearCache"})).unwrap();
        assert_eq!(req, ActionRequest::ClearCache);

        let req: ActionRequest = serde_json::from_value(json!({
            "action": "inspectSelectedLink",
            "page": {"links": [], "selected": {"href": "http://bit.ly/x", "text": "x"}}
        }))
        .unwrap();
        assert_eq!(req.name(), "inspectSelectedLink");
    }

    #[test]
    fn test_inspect_without_page_defaults_to_empty() {
        let req: ActionRequest = serde_json::from_value(json!({"action": "inspectAllLinks"})).unwrap();
        assert_eq!(
            req,
            ActionRequest::InspectAllLinks {
                page: PageSnapshot::default()
            }
        );
    }

    #[test]
    fn test_unknown_action_rejected() {
        let res: Result<ActionRequest, _> = serde_json::from_value(json!({"action": "reboot"}));
        assert!(res.is_err());
    }

    #[test]
    fn test_no_selection_shape() {
        let json = serde_json::to_value(ActionResponse::Selected(SelectedLinkResponse::no_selection())).unwrap();
        assert_eq!(
            json,
            json!({"safe": true, "message": "No link selected. Please select a link on the page."})
        );
    }
}
