//! Common traits for LinkGuard.
//!
//! These are the seams to the collaborators around the cache and the scoring
//! engine: where snapshots are stored, who answers threat lookups, where links
//! come from, and what time it is.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Link, ThreatResult};

// ═══════════════════════════════════════════════════════════════════════════════
// PERSISTENT STORE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Key-value blob storage.
///
/// Only single-key atomicity is assumed: a `set` either replaces the whole
/// blob or fails. There is no ordering between concurrent writes.
#[async_trait]
pub trait PersistentStore: Send + Sync {
    /// Reads the blob stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the blob stored under `key`.
    async fn set(&self, key: &str, value: String) -> Result<()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// THREAT LOOKUP TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for an external threat-intelligence lookup.
///
/// Implementations must be side-effect free from the caller's point of view
/// and must not retry; retrying belongs to the transport.
#[async_trait]
pub trait ThreatLookup: Send + Sync {
    /// Looks up `url` and returns the raw threat-match result.
    async fn lookup(&self, url: &str) -> Result<ThreatResult>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// LINK SOURCE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for whatever enumerates the links of a document.
pub trait LinkSource: Send + Sync {
    /// Lists the links in document order. Empty when there are none.
    fn list_links(&self) -> Vec<Link>;

    /// Returns the link under the user's selection, if any.
    fn selected_link(&self) -> Option<Link>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLOCK TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Source of wall-clock time in epoch milliseconds.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}
