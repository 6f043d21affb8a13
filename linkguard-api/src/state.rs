//! App state: config, cache, analyzer, router.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use linkguard_cache::{CacheConfig, FileStore, MemoryStore, ThreatCache};
use linkguard_core::constants::{DEFAULT_CACHE_MAX_AGE_MS, DEFAULT_CACHE_MAX_ENTRIES, SAFE_BROWSING_ENDPOINT};
use linkguard_core::error::Result;
use linkguard_core::traits::{PersistentStore, ThreatLookup};
use linkguard_lookup::{DisabledLookup, SafeBrowsingClient, SafeBrowsingConfig};
use linkguard_scanner::LinkAnalyzer;

use crate::router::RequestRouter;

const DEFAULT_LOOKUP_RPS: u32 = 10;

/// Service configuration, usually read from the environment.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Safe Browsing API key; lookups are disabled without one
    pub safe_browsing_api_key: Option<String>,
    /// Safe Browsing endpoint
    pub safe_browsing_endpoint: String,
    /// Snapshot file; an in-memory store is used when absent
    pub cache_path: Option<PathBuf>,
    /// Cache capacity
    pub cache_max_entries: usize,
    /// Cache entry lifetime in seconds
    pub cache_max_age_secs: u64,
    /// Client-side lookup rate limit
    pub lookup_rps: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            safe_browsing_api_key: None,
            safe_browsing_endpoint: SAFE_BROWSING_ENDPOINT.into(),
            cache_path: None,
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            cache_max_age_secs: DEFAULT_CACHE_MAX_AGE_MS / 1000,
            lookup_rps: DEFAULT_LOOKUP_RPS,
        }
    }
}

impl ApiConfig {
    /// Reads the config from the environment, loading `.env` first.
    ///
    /// Unset or unparsable numeric values fall back to the defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        Self {
            safe_browsing_api_key: std::env::var("SAFE_BROWSING_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            safe_browsing_endpoint: std::env::var("SAFE_BROWSING_ENDPOINT")
                .unwrap_or(defaults.safe_browsing_endpoint),
            cache_path: std::env::var("LINKGUARD_CACHE_PATH").ok().map(PathBuf::from),
            cache_max_entries: env_or("LINKGUARD_CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            cache_max_age_secs: env_or("LINKGUARD_CACHE_MAX_AGE_SECS", defaults.cache_max_age_secs),
            lookup_rps: env_or("LINKGUARD_LOOKUP_RPS", defaults.lookup_rps),
        }
    }

    /// Cache settings derived from this config.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            max_entries: self.cache_max_entries,
            max_age_ms: self.cache_max_age_secs.saturating_mul(1000),
            ..CacheConfig::default()
        }
    }

    /// True when a Safe Browsing key is configured.
    pub fn lookup_enabled(&self) -> bool {
        self.safe_browsing_api_key.is_some()
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(name, value = %raw, "Ignoring unparsable setting");
            default
        }),
        Err(_) => default,
    }
}

/// Shared state behind every handler.
pub struct AppState {
    /// Effective configuration
    pub config: ApiConfig,
    /// Action dispatcher
    pub router: RequestRouter,
    started: Instant,
}

impl AppState {
    /// Builds state around an existing analyzer.
    pub fn new(config: ApiConfig, analyzer: Arc<LinkAnalyzer>) -> Self {
        Self {
            config,
            router: RequestRouter::new(analyzer),
            started: Instant::now(),
        }
    }

    /// Wires store, cache, lookup client, and analyzer from `config`, then
    /// loads the persisted snapshot.
    pub async fn initialize(config: ApiConfig) -> Result<Self> {
        let store: Arc<dyn PersistentStore> = match &config.cache_path {
            Some(path) => Arc::new(FileStore::new(path)),
            None => Arc::new(MemoryStore::new()),
        };

        let cache = Arc::new(ThreatCache::with_config(config.cache_config(), store));
        let restored = cache.load().await;

        let lookup: Arc<dyn ThreatLookup> = match &config.safe_browsing_api_key {
            Some(key) => {
                let sb_config = SafeBrowsingConfig::new(key)
                    .with_endpoint(&config.safe_browsing_endpoint)
                    .with_rate_limit(config.lookup_rps);
                Arc::new(SafeBrowsingClient::with_config(sb_config)?)
            }
            None => {
                warn!("SAFE_BROWSING_API_KEY not set, threat lookups disabled");
                Arc::new(DisabledLookup)
            }
        };

        info!(
            restored,
            max_entries = config.cache_max_entries,
            persistent = config.cache_path.is_some(),
            "Inspection state ready"
        );

        let analyzer = Arc::new(LinkAnalyzer::new(cache, lookup));
        Ok(Self::new(config, analyzer))
    }

    /// Seconds since the state was built.
    pub fn uptime_seconds(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
