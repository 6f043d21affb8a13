//! Threat lookup clients for LinkGuard.
//!
//! Talks to the Google Safe Browsing v4 `threatMatches:find` endpoint,
//! throttled client-side so bursts of page inspections stay under quota.

mod safe_browsing;

pub use safe_browsing::{DisabledLookup, SafeBrowsingClient, SafeBrowsingConfig};
