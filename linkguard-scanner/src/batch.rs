//! Batch inspection of a page's links.

use std::fmt::Write;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use linkguard_core::constants::BATCH_LINK_LIMIT;
use linkguard_core::types::{CacheStats, Link, RiskVerdict};

use crate::analyzer::LinkAnalyzer;

/// Verdict for one link of a batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkReport {
    /// The inspected link
    pub link: Link,
    /// Its verdict
    pub verdict: RiskVerdict,
}

/// Aggregate details of a batch inspection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDetails {
    /// Links inspected (at most the batch limit)
    pub total_links: usize,
    /// Links judged unsafe
    pub unsafe_links: usize,
    /// Per-link results in page order
    pub results: Vec<LinkReport>,
    /// Cache state after the batch
    pub cache_stats: CacheStats,
}

/// Result of inspecting a page's links.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchVerdict {
    /// True when every inspected link is safe
    pub safe: bool,
    /// Combined report
    pub message: String,
    /// Absent when the page had no links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<BatchDetails>,
}

impl BatchVerdict {
    fn empty() -> Self {
        Self {
            safe: true,
            message: "No links found on this page.".into(),
            details: None,
        }
    }
}

impl LinkAnalyzer {
    /// Inspects the first [`BATCH_LINK_LIMIT`] links concurrently.
    ///
    /// Results keep the order of `links`.
    #[instrument(skip_all, fields(links = links.len()))]
    pub async fn inspect_links(&self, links: &[Link]) -> BatchVerdict {
        if links.is_empty() {
            return BatchVerdict::empty();
        }

        let batch = &links[..links.len().min(BATCH_LINK_LIMIT)];
        let verdicts = join_all(batch.iter().map(|link| self.analyze(&link.href))).await;

        let results: Vec<LinkReport> = batch
            .iter()
            .cloned()
            .zip(verdicts)
            .map(|(link, verdict)| LinkReport { link, verdict })
            .collect();

        let unsafe_links = results.iter().filter(|r| !r.verdict.safe).count();
        info!(total = results.len(), unsafe_links, "Batch inspection complete");

        BatchVerdict {
            safe: unsafe_links == 0,
            message: render_report(&results),
            details: Some(BatchDetails {
                total_links: results.len(),
                unsafe_links,
                results,
                cache_stats: self.cache().stats(),
            }),
        }
    }
}

fn render_report(results: &[LinkReport]) -> String {
    let mut message = format!("Analyzed {} links:\n\n", results.len());
    for report in results {
        let marker = if report.verdict.safe { "✅" } else { "⚠️" };
        let _ = writeln!(message, "{} {}", marker, report.link.label());
        let _ = writeln!(message, "{}", report.verdict.message);
        if let Some(status) = report.verdict.cache_status() {
            let _ = writeln!(message, "(Result {})", status);
        }
        message.push('\n');
    }
    message
}
