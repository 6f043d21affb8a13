//! Constants for LinkGuard.
//!
//! Cache defaults mirror the values the inspection service has always shipped
//! with. The reference sets feed the heuristic signals in `linkguard-scanner`.

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum number of URLs held by the lookup cache.
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1000;

/// Age after which a cached lookup is considered stale (30 minutes).
pub const DEFAULT_CACHE_MAX_AGE_MS: u64 = 30 * 60 * 1000;

/// Key under which the cache snapshot is persisted.
pub const CACHE_STORAGE_KEY: &str = "urlCache";

// ═══════════════════════════════════════════════════════════════════════════════
// BATCH INSPECTION
// ═══════════════════════════════════════════════════════════════════════════════

/// Number of links inspected per page request. Bounds lookup cost.
pub const BATCH_LINK_LIMIT: usize = 5;

// ═══════════════════════════════════════════════════════════════════════════════
// HEURISTIC REFERENCE SETS
// ═══════════════════════════════════════════════════════════════════════════════

/// Hosts of well-known URL shorteners (substring match on the host).
pub const URL_SHORTENERS: &[&str] = &[
    "bit.ly",
    "tinyurl.com",
    "goo.gl",
    "t.co",
    "ow.ly",
    "is.gd",
    "v.gd",
    "buff.ly",
];

/// Keywords that flag a path or query string.
pub const SUSPICIOUS_KEYWORDS: &[&str] = &[
    "phishing",
    "malware",
    "virus",
    "hack",
    "exploit",
    "crack",
    "warez",
    "keygen",
    "cracked",
    "hacked",
    "free-download",
    "download-free",
];

/// File extensions that flag a path when it ends with one of them.
pub const SUSPICIOUS_EXTENSIONS: &[&str] = &[
    ".exe", ".msi", ".bat", ".cmd", ".ps1", ".vbs", ".js", ".jar", ".zip", ".rar",
];

/// Known-bad domains (substring match on the host).
pub const SUSPICIOUS_DOMAINS: &[&str] = &[
    "free-downloads.com",
    "warez.com",
    "cracks.com",
    "keygens.com",
];

// ═══════════════════════════════════════════════════════════════════════════════
// SAFE BROWSING
// ═══════════════════════════════════════════════════════════════════════════════

/// Safe Browsing v4 lookup endpoint.
pub const SAFE_BROWSING_ENDPOINT: &str =
    "https://safebrowsing.googleapis.com/v4/threatMatches:find";

/// Threat types requested from Safe Browsing.
pub const SAFE_BROWSING_THREAT_TYPES: &[&str] = &[
    "MALWARE",
    "SOCIAL_ENGINEERING",
    "UNWANTED_SOFTWARE",
    "POTENTIALLY_HARMFUL_APPLICATION",
];
