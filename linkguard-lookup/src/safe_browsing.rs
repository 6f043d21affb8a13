//! Safe Browsing client implementation.
//!
//! One POST per URL, no retries. A failed lookup is reported to the caller,
//! which decides how to degrade.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::Serialize;
use tracing::{debug, instrument};

use linkguard_core::constants::{SAFE_BROWSING_ENDPOINT, SAFE_BROWSING_THREAT_TYPES};
use linkguard_core::error::{LinkGuardError, Result};
use linkguard_core::traits::ThreatLookup;
use linkguard_core::types::ThreatResult;

/// Safe Browsing client configuration.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SafeBrowsingConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Lookup endpoint (overridable for tests and proxies)
    pub endpoint: String,
    /// Client id reported to the service
    pub client_id: String,
    /// Client version reported to the service
    pub client_version: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Maximum lookups per second
    pub requests_per_second: u32,
}

impl SafeBrowsingConfig {
    /// Creates config for the public endpoint with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: SAFE_BROWSING_ENDPOINT.into(),
            client_id: "linkguard".into(),
            client_version: env!("CARGO_PKG_VERSION").into(),
            timeout_seconds: 10,
            requests_per_second: 10,
        }
    }

    /// Points the client at a different endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the client-side rate limit.
    pub fn with_rate_limit(mut self, requests_per_second: u32) -> Self {
        self.requests_per_second = requests_per_second;
        self
    }
}

/// `threatMatches:find` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FindThreatMatchesRequest<'a> {
    client: ClientInfo<'a>,
    threat_info: ThreatInfo<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientInfo<'a> {
    client_id: &'a str,
    client_version: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatInfo<'a> {
    threat_types: &'a [&'a str],
    platform_types: [&'a str; 1],
    threat_entry_types: [&'a str; 1],
    threat_entries: [ThreatEntryRef<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ThreatEntryRef<'a> {
    url: &'a str,
}

impl<'a> FindThreatMatchesRequest<'a> {
    fn for_url(config: &'a SafeBrowsingConfig, url: &'a str) -> Self {
        Self {
            client: ClientInfo {
                client_id: &config.client_id,
                client_version: &config.client_version,
            },
            threat_info: ThreatInfo {
                threat_types: SAFE_BROWSING_THREAT_TYPES,
                platform_types: ["ANY_PLATFORM"],
                threat_entry_types: ["URL"],
                threat_entries: [ThreatEntryRef { url }],
            },
        }
    }
}

/// Safe Browsing lookup client.
pub struct SafeBrowsingClient {
    config: SafeBrowsingConfig,
    http_client: reqwest::Client,
    limiter: DefaultDirectRateLimiter,
}

impl SafeBrowsingClient {
    /// Creates a client with the given config.
    pub fn with_config(config: SafeBrowsingConfig) -> Result<Self> {
        let rate = NonZeroU32::new(config.requests_per_second).ok_or_else(|| {
            LinkGuardError::ConfigError("requests_per_second must be greater than zero".into())
        })?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| LinkGuardError::ConfigError(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            limiter: RateLimiter::direct(Quota::per_second(rate)),
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SafeBrowsingConfig {
        &self.config
    }
}

#[async_trait]
impl ThreatLookup for SafeBrowsingClient {
    #[instrument(skip(self))]
    async fn lookup(&self, url: &str) -> Result<ThreatResult> {
        self.limiter.until_ready().await;

        let body = FindThreatMatchesRequest::for_url(&self.config, url);

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| LinkGuardError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LinkGuardError::LookupFailed {
                url: url.to_string(),
                reason: format!("HTTP {}: {}", status, text),
            });
        }

        let result: ThreatResult = response.json().await.map_err(|e| LinkGuardError::LookupFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        debug!(url, matches = result.matches.len(), "Safe Browsing lookup complete");
        Ok(result)
    }
}

/// Lookup used when no API key is configured. Every call fails, so analysis
/// proceeds on local signals and nothing is cached.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledLookup;

#[async_trait]
impl ThreatLookup for DisabledLookup {
    async fn lookup(&self, url: &str) -> Result<ThreatResult> {
        Err(LinkGuardError::LookupFailed {
            url: url.to_string(),
            reason: "threat lookup disabled: no API key configured".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> SafeBrowsingClient {
        let config = SafeBrowsingConfig::new("test-key")
            .with_endpoint(format!("{}/v4/threatMatches:find", server.uri()));
        SafeBrowsingClient::with_config(config).unwrap()
    }

    #[tokio::test]
    async fn test_lookup_reports_matches() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v4/threatMatches:find"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(json!({
                "client": {"clientId": "linkguard"},
                "threatInfo": {
                    "platformTypes": ["ANY_PLATFORM"],
                    "threatEntryTypes": ["URL"],
                    "threatEntries": [{"url": "http://evil.test/"}]
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "matches": [{
                    "threatType": "MALWARE",
                    "platformType": "ANY_PLATFORM",
                    "threatEntryType": "URL",
                    "threat": {"url": "http://evil.test/"},
                    "cacheDuration": "300s"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = client.lookup("http://evil.test/").await.unwrap();
        assert_eq!(result.threat_types(), vec!["MALWARE"]);
    }

    #[tokio::test]
    async fn test_lookup_empty_body_is_clean() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = client.lookup("https://example.com/").await.unwrap();
        assert!(!result.has_matches());
    }

    #[tokio::test]
    async fn test_lookup_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.lookup("https://example.com/").await.unwrap_err();
        assert!(matches!(err, LinkGuardError::LookupFailed { .. }));
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn test_lookup_unparsable_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.lookup("https://example.com/").await.unwrap_err();
        assert!(matches!(err, LinkGuardError::LookupFailed { .. }));
    }

    #[tokio::test]
    async fn test_disabled_lookup_fails() {
        let err = DisabledLookup.lookup("https://example.com/").await.unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        let config = SafeBrowsingConfig::new("k").with_rate_limit(0);
        assert!(matches!(
            SafeBrowsingClient::with_config(config),
            Err(LinkGuardError::ConfigError(_))
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let config = SafeBrowsingConfig::new("k");
        let body = serde_json::to_value(FindThreatMatchesRequest::for_url(&config, "https://a.com/")).unwrap();
        assert_eq!(body["threatInfo"]["threatTypes"].as_array().unwrap().len(), 4);
        assert_eq!(body["threatInfo"]["threatEntries"][0]["url"], "https://a.com/");
        assert_eq!(body["client"]["clientId"], "linkguard");
    }
}
