//! Threat lookup result types.
//!
//! Field names follow the Safe Browsing v4 `threatMatches:find` response so the
//! raw body can be cached and replayed as-is. Fields without a typed slot are
//! kept in `extra` and written back unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw answer of a threat lookup.
///
/// An empty object (`{}`) means no matches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatResult {
    /// Matches found for the URL
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<ThreatMatch>,
    /// Remaining response fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ThreatResult {
    /// A result with no matches.
    pub fn clean() -> Self {
        Self::default()
    }

    /// A result with one match per threat type.
    pub fn with_threats<I, S>(threat_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            matches: threat_types.into_iter().map(ThreatMatch::new).collect(),
            extra: Map::new(),
        }
    }

    /// Returns true if at least one match was reported.
    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Threat type labels in the order the service reported them.
    pub fn threat_types(&self) -> Vec<String> {
        self.matches.iter().map(|m| m.threat_type.clone()).collect()
    }
}

/// A single threat match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatMatch {
    /// Threat type label, e.g. `MALWARE`
    pub threat_type: String,
    /// Platform the match applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_type: Option<String>,
    /// Kind of entry matched, usually `URL`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threat_entry_type: Option<String>,
    /// The matched entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threat: Option<ThreatEntry>,
    /// How long the service says the match may be cached, e.g. `300s`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_duration: Option<String>,
    /// Remaining match fields, e.g. `threatEntryMetadata`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ThreatMatch {
    /// Creates a match carrying only a threat type.
    pub fn new(threat_type: impl Into<String>) -> Self {
        Self {
            threat_type: threat_type.into(),
            platform_type: None,
            threat_entry_type: None,
            threat: None,
            cache_duration: None,
            extra: Map::new(),
        }
    }
}

/// The entry a match refers to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatEntry {
    /// The matched URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Remaining entry fields, e.g. `hash` or `digest`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_body_has_no_matches() {
        let result: ThreatResult = serde_json::from_str("{}").unwrap();
        assert!(!result.has_matches());
        assert_eq!(serde_json::to_string(&result).unwrap(), "{}");
    }

    #[test]
    fn test_parses_safe_browsing_response() {
        let body = r#"{
            "matches": [{
                "threatType": "MALWARE",
                "platformType": "ANY_PLATFORM",
                "threatEntryType": "URL",
                "threat": {"url": "http://malware.testing.google.test/testing/malware/"},
                "cacheDuration": "300s"
            }, {
                "threatType": "SOCIAL_ENGINEERING",
                "platformType": "ANY_PLATFORM"
            }]
        }"#;
        let result: ThreatResult = serde_json::from_str(body).unwrap();
        assert!(result.has_matches());
        assert_eq!(result.threat_types(), vec!["MALWARE", "SOCIAL_ENGINEERING"]);
        assert_eq!(result.matches[0].cache_duration.as_deref(), Some("300s"));
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let body = json!({
            "matches": [{
                "threatType": "MALWARE",
                "platformType": "WINDOWS",
                "threatEntryType": "URL",
                "threat": {"url": "http://malware.testing.google.test/testing/malware/"},
                "threatEntryMetadata": {
                    "entries": [{"key": "bWFsd2FyZV90aHJlYXRfdHlwZQ==", "value": "TEFORElORw=="}]
                },
                "cacheDuration": "300.000s"
            }],
            "nextPageToken": "abc"
        });

        let result: ThreatResult = serde_json::from_value(body.clone()).unwrap();
        assert!(result.matches[0].extra.contains_key("threatEntryMetadata"));
        assert_eq!(result.extra["nextPageToken"], "abc");

        let back = serde_json::to_value(&result).unwrap();
        assert_eq!(back, body);
    }

    #[test]
    fn test_with_threats() {
        let result = ThreatResult::with_threats(["UNWANTED_SOFTWARE"]);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].threat_type, "UNWANTED_SOFTWARE");
    }
}
