//! Single-URL risk analysis.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};
use url::Url;

use linkguard_cache::ThreatCache;
use linkguard_core::traits::ThreatLookup;
use linkguard_core::types::{AnalysisDetails, CacheStatus, RiskVerdict, ThreatResult, VerdictDetails};

use crate::message::render_message;
use crate::signals::{apply_threat_result, evaluate_signals};

/// Scores URLs by combining local heuristics with cached threat lookups.
///
/// # Lookups
///
/// The cache is checked by exact URL string first. On a miss the lookup
/// runs under a per-URL lock, so concurrent analyses of one URL trigger at
/// most one fetch; the others find the fresh entry in the cache. A failed
/// lookup is logged, not cached, and analysis continues on local signals.
pub struct LinkAnalyzer {
    cache: Arc<ThreatCache>,
    lookup: Arc<dyn ThreatLookup>,
    /// Per-URL locks for lookups in progress
    inflight: DashMap<String, Arc<Mutex<()>>>,
}

impl LinkAnalyzer {
    /// Creates an analyzer over a shared cache and lookup client.
    pub fn new(cache: Arc<ThreatCache>, lookup: Arc<dyn ThreatLookup>) -> Self {
        Self {
            cache,
            lookup,
            inflight: DashMap::new(),
        }
    }

    /// Returns the lookup cache.
    pub fn cache(&self) -> &Arc<ThreatCache> {
        &self.cache
    }

    /// Analyzes one URL. Never fails: a malformed URL yields an unsafe verdict.
    #[instrument(skip(self))]
    pub async fn analyze(&self, url: &str) -> RiskVerdict {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(url, error = %e, "Malformed URL");
                return RiskVerdict::error(e.to_string());
            }
        };

        let mut checks = evaluate_signals(&parsed);

        let (threat, cache_status) = self.threat_data(url).await;
        if let Some(result) = &threat {
            apply_threat_result(&mut checks, result);
        }

        let domain = parsed.host_str().unwrap_or("").to_string();
        let risk_score = checks.risk_score();
        let message = render_message(&domain, &checks);

        debug!(url, risk_score, %cache_status, "Analyzed link");

        RiskVerdict {
            safe: risk_score == 0,
            message,
            details: VerdictDetails::Analysis(AnalysisDetails {
                domain,
                risk_score,
                checks,
                safe_browsing_result: threat,
                cache_status,
            }),
        }
    }

    /// Resolves threat data for `url`, recording where it came from.
    async fn threat_data(&self, url: &str) -> (Option<ThreatResult>, CacheStatus) {
        if let Some(hit) = self.cache.get(url).await {
            debug!(url, "Cache hit");
            return (Some(hit), CacheStatus::Cached);
        }

        let entry = InflightEntry {
            inflight: &self.inflight,
            url,
            lock: self
                .inflight
                .entry(url.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value()
                .clone(),
        };

        let _guard = entry.lock.lock().await;

        if let Some(hit) = self.cache.get(url).await {
            debug!(url, "Cache filled by concurrent lookup");
            return (Some(hit), CacheStatus::Cached);
        }

        debug!(url, "Cache miss, looking up");
        match self.lookup.lookup(url).await {
            Ok(result) => {
                self.cache.set(url, result.clone()).await;
                (Some(result), CacheStatus::Fresh)
            }
            Err(e) => {
                warn!(url, error = %e, "Threat lookup failed, using local signals only");
                (None, CacheStatus::Unavailable)
            }
        }
    }
}

/// A caller's handle on a per-URL lock.
///
/// Dropping it removes the map entry once no other caller holds or waits on
/// the lock. This also runs when an analysis is cancelled mid-lookup.
struct InflightEntry<'a> {
    inflight: &'a DashMap<String, Arc<Mutex<()>>>,
    url: &'a str,
    lock: Arc<Mutex<()>>,
}

impl Drop for InflightEntry<'_> {
    fn drop(&mut self) {
        // One reference in the map, one here.
        self.inflight
            .remove_if(self.url, |_, lock| Arc::strong_count(lock) <= 2);
    }
}
