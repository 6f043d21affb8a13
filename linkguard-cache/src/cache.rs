//! Bounded TTL cache with snapshot persistence.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use linkguard_core::constants::{CACHE_STORAGE_KEY, DEFAULT_CACHE_MAX_AGE_MS, DEFAULT_CACHE_MAX_ENTRIES};
use linkguard_core::error::{LinkGuardError, Result};
use linkguard_core::traits::{Clock, PersistentStore};
use linkguard_core::types::{CacheStats, ThreatResult};

use crate::clock::SystemClock;

/// Cache of raw threat lookup results keyed by URL.
pub type ThreatCache = UrlCache<ThreatResult>;

/// Cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries
    pub max_entries: usize,
    /// Age in milliseconds after which an entry is expired
    pub max_age_ms: u64,
    /// Key under which the snapshot is persisted
    pub storage_key: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            max_age_ms: DEFAULT_CACHE_MAX_AGE_MS,
            storage_key: CACHE_STORAGE_KEY.into(),
        }
    }
}

/// Cache entry with insertion time.
#[derive(Clone, Debug)]
struct CacheEntry<T> {
    data: T,
    inserted_at: u64,
    /// Insertion sequence, breaks ties between entries inserted in the same millisecond
    seq: u64,
}

impl<T> CacheEntry<T> {
    fn is_expired(&self, now: u64, max_age_ms: u64) -> bool {
        now.saturating_sub(self.inserted_at) > max_age_ms
    }
}

/// Persisted form of an entry: `{"data": ..., "timestamp": <epoch ms>}`.
#[derive(Deserialize)]
struct PersistedEntry<T> {
    data: T,
    timestamp: u64,
}

#[derive(Serialize)]
struct PersistedEntryRef<'a, T> {
    data: &'a T,
    timestamp: u64,
}

struct CacheState<T> {
    entries: HashMap<String, CacheEntry<T>>,
    next_seq: u64,
}

impl<T> CacheState<T> {
    fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Removes the entry with the earliest insertion and returns its key.
    fn evict_oldest(&mut self) -> Option<String> {
        let oldest_key = self
            .entries
            .iter()
            .min_by_key(|(_, e)| (e.inserted_at, e.seq))
            .map(|(k, _)| k.clone())?;
        self.entries.remove(&oldest_key);
        Some(oldest_key)
    }
}

/// Bounded, time-limited cache persisted as a full snapshot.
///
/// The map is only touched under a short synchronous lock, so every call
/// leaves it fully updated before the snapshot write-back is awaited.
/// Write-backs themselves are not serialized against each other: when two
/// mutations race, the persisted snapshot is whichever write finished last.
pub struct UrlCache<T> {
    state: Mutex<CacheState<T>>,
    store: Arc<dyn PersistentStore>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
}

impl<T> UrlCache<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    /// Creates an empty cache with default configuration.
    pub fn new(store: Arc<dyn PersistentStore>) -> Self {
        Self::with_config(CacheConfig::default(), store)
    }

    /// Creates an empty cache with custom configuration.
    pub fn with_config(config: CacheConfig, store: Arc<dyn PersistentStore>) -> Self {
        Self {
            state: Mutex::new(CacheState::empty()),
            store,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Replaces the clock used for timestamps and expiry.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Replaces the in-memory state with the persisted snapshot.
    ///
    /// A missing, unreadable, or unparsable snapshot leaves the cache empty.
    /// Returns the number of entries loaded.
    #[instrument(skip(self))]
    pub async fn load(&self) -> usize {
        let loaded = match self.read_snapshot().await {
            Ok(Some(entries)) => entries,
            Ok(None) => {
                debug!(key = %self.config.storage_key, "No persisted cache snapshot");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Failed to load cache snapshot, starting empty");
                Vec::new()
            }
        };

        let mut state = CacheState::empty();
        for (url, entry) in loaded {
            let seq = state.next_seq;
            state.next_seq += 1;
            state.entries.insert(url, CacheEntry {
                data: entry.data,
                inserted_at: entry.timestamp,
                seq,
            });
        }
        while state.entries.len() > self.config.max_entries {
            state.evict_oldest();
        }

        let count = state.entries.len();
        *self.state.lock() = state;

        info!(count, "Loaded cache from storage");
        count
    }

    /// Returns the cached payload for `key` if present and not expired.
    ///
    /// An expired entry is removed and the removal persisted.
    pub async fn get(&self, key: &str) -> Option<T> {
        let snapshot = {
            let mut state = self.state.lock();
            let now = self.clock.now_millis();

            match state.entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now, self.config.max_age_ms) => {
                    return Some(entry.data.clone());
                }
                Some(_) => {}
            }

            state.entries.remove(key);
            debug!(url = key, "Removed expired cache entry");
            self.serialize(&state)
        };

        self.persist(snapshot).await;
        None
    }

    /// Inserts `data` under `key`, stamped with the current time.
    ///
    /// A new key at capacity evicts the earliest-inserted entry first.
    /// Overwriting an existing key is not an eviction and resets its age.
    pub async fn set(&self, key: impl Into<String>, data: T) {
        let key = key.into();
        let snapshot = {
            let mut state = self.state.lock();

            if self.config.max_entries == 0 {
                debug!(url = %key, "Cache capacity is zero, entry not stored");
            } else {
                if !state.entries.contains_key(&key) {
                    while state.entries.len() >= self.config.max_entries {
                        match state.evict_oldest() {
                            Some(evicted) => debug!(url = %evicted, "Evicted oldest cache entry"),
                            None => break,
                        }
                    }
                }

                let seq = state.next_seq;
                state.next_seq += 1;
                let inserted_at = self.clock.now_millis();
                state.entries.insert(key, CacheEntry { data, inserted_at, seq });
            }

            self.serialize(&state)
        };

        self.persist(snapshot).await;
    }

    /// Removes every entry and persists the empty snapshot.
    pub async fn clear(&self) {
        let snapshot = {
            let mut state = self.state.lock();
            state.entries.clear();
            self.serialize(&state)
        };
        info!("Cleared cache");
        self.persist(snapshot).await;
    }

    /// Writes the current snapshot to the store, returning any failure.
    #[instrument(skip(self))]
    pub async fn save(&self) -> Result<()> {
        let blob = {
            let state = self.state.lock();
            Self::encode(&state)?
        };
        self.store.set(&self.config.storage_key, blob).await
    }

    /// Returns a point-in-time summary without touching the entries.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        let now = self.clock.now_millis();

        let timestamps = state.entries.values().map(|e| e.inserted_at);
        let expired = state
            .entries
            .values()
            .filter(|e| e.is_expired(now, self.config.max_age_ms))
            .count();

        CacheStats {
            total_entries: state.entries.len(),
            oldest_entry: timestamps.clone().min(),
            newest_entry: timestamps.max(),
            expired_entries: expired,
            max_entries: self.config.max_entries,
        }
    }

    /// Returns the number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Reads and parses the snapshot, oldest entries first.
    async fn read_snapshot(&self) -> Result<Option<Vec<(String, PersistedEntry<T>)>>> {
        let Some(blob) = self.store.get(&self.config.storage_key).await? else {
            return Ok(None);
        };

        let parsed: HashMap<String, PersistedEntry<T>> = serde_json::from_str(&blob)?;
        let mut entries: Vec<_> = parsed.into_iter().collect();
        entries.sort_by(|(a_url, a), (b_url, b)| {
            a.timestamp.cmp(&b.timestamp).then_with(|| a_url.cmp(b_url))
        });
        Ok(Some(entries))
    }

    fn encode(state: &CacheState<T>) -> Result<String> {
        let flat: HashMap<&str, PersistedEntryRef<'_, T>> = state
            .entries
            .iter()
            .map(|(url, e)| {
                (url.as_str(), PersistedEntryRef {
                    data: &e.data,
                    timestamp: e.inserted_at,
                })
            })
            .collect();
        serde_json::to_string(&flat).map_err(LinkGuardError::from)
    }

    fn serialize(&self, state: &CacheState<T>) -> Option<String> {
        match Self::encode(state) {
            Ok(blob) => Some(blob),
            Err(e) => {
                warn!(error = %e, "Failed to serialize cache snapshot");
                None
            }
        }
    }

    /// Best-effort write-back: failures are logged and in-memory state is kept.
    async fn persist(&self, snapshot: Option<String>) {
        let Some(blob) = snapshot else { return };
        match self.store.set(&self.config.storage_key, blob).await {
            Ok(()) => debug!(count = self.len(), "Saved cache to storage"),
            Err(e) => warn!(error = %e, "Failed to save cache snapshot"),
        }
    }
}
