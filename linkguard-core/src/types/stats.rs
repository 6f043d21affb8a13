//! Cache statistics.

use serde::{Deserialize, Serialize};

/// Point-in-time summary of the lookup cache.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Entries currently held, expired ones included
    pub total_entries: usize,
    /// Insertion time of the oldest entry (epoch ms)
    pub oldest_entry: Option<u64>,
    /// Insertion time of the newest entry (epoch ms)
    pub newest_entry: Option<u64>,
    /// Entries older than the maximum age that have not been read since
    pub expired_entries: usize,
    /// Configured capacity
    #[serde(default)]
    pub max_entries: usize,
}

impl CacheStats {
    /// Fill level as a percentage of capacity.
    pub fn usage_percent(&self) -> f64 {
        if self.max_entries == 0 {
            return 0.0;
        }
        self.total_entries as f64 / self.max_entries as f64 * 100.0
    }
}
