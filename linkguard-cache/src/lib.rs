//! # LinkGuard Cache
//!
//! Bounded, time-limited cache for threat lookup results, persisted as a
//! single JSON snapshot after every mutation.
//!
//! - **Capacity**: inserting a new key at capacity evicts the earliest-inserted
//!   entry (FIFO, not LRU)
//! - **Expiry**: entries older than the maximum age read as absent and are
//!   deleted on that read
//! - **Persistence**: the full mapping is written back through a
//!   [`PersistentStore`](linkguard_core::PersistentStore) on every change
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use linkguard_cache::{MemoryStore, ThreatCache};
//!
//! let cache = ThreatCache::new(Arc::new(MemoryStore::new()));
//! cache.load().await;
//!
//! cache.set("https://example.com/", ThreatResult::clean()).await;
//! assert!(cache.get("https://example.com/").await.is_some());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cache;
mod clock;
mod file;
mod memory;

pub use cache::{CacheConfig, ThreatCache, UrlCache};
pub use clock::{ManualClock, SystemClock};
pub use file::FileStore;
pub use memory::MemoryStore;
