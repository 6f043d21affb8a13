//! Domain types for LinkGuard.
//!
//! - [`Link`] / [`PageSnapshot`]: links as enumerated from a page
//! - [`ThreatResult`]: raw answer of a threat lookup
//! - [`Signal`] / [`Checks`]: the heuristic signal catalog and its evaluation
//! - [`RiskVerdict`]: the per-URL result of scoring
//! - [`CacheStats`]: point-in-time summary of the lookup cache

mod link;
mod stats;
mod threat;
mod verdict;

pub use link::*;
pub use stats::*;
pub use threat::*;
pub use verdict::*;
