//! Signal catalog and verdict types.
//!
//! The catalog order of [`Signal::ALL`] is the order in which triggered signals
//! are reported, and its length is the denominator of the risk score.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ThreatResult;

// ═══════════════════════════════════════════════════════════════════════════════
// SIGNAL CATALOG
// ═══════════════════════════════════════════════════════════════════════════════

/// A boolean heuristic derived from a URL or from a threat lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Host belongs to a URL shortener
    UrlShortener,
    /// Path or query contains a suspicious keyword
    SuspiciousKeyword,
    /// Path ends with an executable or archive extension
    SuspiciousExtension,
    /// Host matches a known-bad domain
    SuspiciousDomain,
    /// Host is a dotted IPv4 address
    IpAddress,
    /// Host contains characters outside `[A-Za-z0-9.-]`
    UnusualCharacters,
    /// The threat lookup reported at least one match
    SafeBrowsingThreat,
}

impl Signal {
    /// Every signal, in reporting order.
    pub const ALL: &'static [Signal] = &[
        Signal::UrlShortener,
        Signal::SuspiciousKeyword,
        Signal::SuspiciousExtension,
        Signal::SuspiciousDomain,
        Signal::IpAddress,
        Signal::UnusualCharacters,
        Signal::SafeBrowsingThreat,
    ];

    /// Number of signals in the catalog.
    pub fn count() -> usize {
        Self::ALL.len()
    }

    /// Key used for this signal in serialized checks.
    pub fn key(self) -> &'static str {
        match self {
            Signal::UrlShortener => "isUrlShortener",
            Signal::SuspiciousKeyword => "hasSuspiciousKeyword",
            Signal::SuspiciousExtension => "hasSuspiciousExtension",
            Signal::SuspiciousDomain => "isSuspiciousDomain",
            Signal::IpAddress => "hasIPAddress",
            Signal::UnusualCharacters => "hasUnusualCharacters",
            Signal::SafeBrowsingThreat => "hasSafeBrowsingThreat",
        }
    }

    /// Warning line shown when this signal is triggered.
    pub fn warning(self) -> &'static str {
        match self {
            Signal::UrlShortener => "Contains URL shortener",
            Signal::SuspiciousKeyword => "Contains suspicious keywords",
            Signal::SuspiciousExtension => "Contains suspicious file extension",
            Signal::SuspiciousDomain => "Matches known suspicious domain",
            Signal::IpAddress => "Uses IP address instead of domain name",
            Signal::UnusualCharacters => "Contains unusual characters in domain",
            Signal::SafeBrowsingThreat => "Google Safe Browsing detected threats:",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Evaluated signals for one URL.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checks {
    /// See [`Signal::UrlShortener`]
    pub is_url_shortener: bool,
    /// See [`Signal::SuspiciousKeyword`]
    pub has_suspicious_keyword: bool,
    /// See [`Signal::SuspiciousExtension`]
    pub has_suspicious_extension: bool,
    /// See [`Signal::SuspiciousDomain`]
    pub is_suspicious_domain: bool,
    /// See [`Signal::IpAddress`]
    #[serde(rename = "hasIPAddress")]
    pub has_ip_address: bool,
    /// See [`Signal::UnusualCharacters`]
    pub has_unusual_characters: bool,
    /// See [`Signal::SafeBrowsingThreat`]
    #[serde(default)]
    pub has_safe_browsing_threat: bool,
    /// Threat type labels reported by the lookup. Carries no extra weight.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub threat_types: Vec<String>,
}

impl Checks {
    /// Returns whether `signal` is set.
    pub fn get(&self, signal: Signal) -> bool {
        match signal {
            Signal::UrlShortener => self.is_url_shortener,
            Signal::SuspiciousKeyword => self.has_suspicious_keyword,
            Signal::SuspiciousExtension => self.has_suspicious_extension,
            Signal::SuspiciousDomain => self.is_suspicious_domain,
            Signal::IpAddress => self.has_ip_address,
            Signal::UnusualCharacters => self.has_unusual_characters,
            Signal::SafeBrowsingThreat => self.has_safe_browsing_threat,
        }
    }

    /// Sets `signal` to `value`.
    pub fn set(&mut self, signal: Signal, value: bool) {
        let slot = match signal {
            Signal::UrlShortener => &mut self.is_url_shortener,
            Signal::SuspiciousKeyword => &mut self.has_suspicious_keyword,
            Signal::SuspiciousExtension => &mut self.has_suspicious_extension,
            Signal::SuspiciousDomain => &mut self.is_suspicious_domain,
            Signal::IpAddress => &mut self.has_ip_address,
            Signal::UnusualCharacters => &mut self.has_unusual_characters,
            Signal::SafeBrowsingThreat => &mut self.has_safe_browsing_threat,
        };
        *slot = value;
    }

    /// Triggered signals in catalog order.
    pub fn triggered(&self) -> impl Iterator<Item = Signal> + '_ {
        Signal::ALL.iter().copied().filter(move |s| self.get(*s))
    }

    /// Number of triggered signals.
    pub fn risk_score(&self) -> usize {
        self.triggered().count()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// VERDICT
// ═══════════════════════════════════════════════════════════════════════════════

/// Where the threat data for a verdict came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// Served from the lookup cache
    Cached,
    /// Fetched from the lookup service for this request
    Fresh,
    /// Lookup failed; local signals only
    Unavailable,
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CacheStatus::Cached => "cached",
            CacheStatus::Fresh => "fresh",
            CacheStatus::Unavailable => "unavailable",
        };
        f.write_str(s)
    }
}

/// Structured part of a verdict for a URL that could be analyzed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDetails {
    /// Host of the URL (empty for host-less URLs)
    pub domain: String,
    /// Number of triggered signals
    pub risk_score: usize,
    /// Every evaluated signal
    pub checks: Checks,
    /// Raw lookup result, `None` when the lookup failed
    pub safe_browsing_result: Option<ThreatResult>,
    /// Source of the lookup result
    pub cache_status: CacheStatus,
}

/// Structured part of a verdict.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VerdictDetails {
    /// Signals were evaluated
    Analysis(AnalysisDetails),
    /// The URL could not be analyzed
    Error {
        /// Why analysis failed
        error: String,
    },
}

/// Result of scoring a single URL.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskVerdict {
    /// True when no signal was triggered
    pub safe: bool,
    /// Human-readable explanation
    pub message: String,
    /// Structured signals and score
    pub details: VerdictDetails,
}

impl RiskVerdict {
    /// Builds the unsafe verdict returned for a URL that could not be analyzed.
    pub fn error(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            safe: false,
            message: format!("Error analyzing link: {}", reason),
            details: VerdictDetails::Error { error: reason },
        }
    }

    /// Analysis details, if the URL could be analyzed.
    pub fn analysis(&self) -> Option<&AnalysisDetails> {
        match &self.details {
            VerdictDetails::Analysis(details) => Some(details),
            VerdictDetails::Error { .. } => None,
        }
    }

    /// Risk score, if the URL could be analyzed.
    pub fn risk_score(&self) -> Option<usize> {
        self.analysis().map(|d| d.risk_score)
    }

    /// Cache status, if a lookup was attempted.
    pub fn cache_status(&self) -> Option<CacheStatus> {
        self.analysis().map(|d| d.cache_status)
    }

    /// Error text, if the URL could not be analyzed.
    pub fn error_reason(&self) -> Option<&str> {
        match &self.details {
            VerdictDetails::Error { error } => Some(error),
            VerdictDetails::Analysis(_) => None,
        }
    }
}
