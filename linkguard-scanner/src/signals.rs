//! Heuristic signal evaluation.
//!
//! Every signal is computed on every call; nothing short-circuits.

use url::Url;

use linkguard_core::constants::{
    SUSPICIOUS_DOMAINS, SUSPICIOUS_EXTENSIONS, SUSPICIOUS_KEYWORDS, URL_SHORTENERS,
};
use linkguard_core::types::{Checks, Signal, ThreatResult};

/// Evaluates the local signals of a parsed URL.
///
/// The threat signal is left unset; see [`apply_threat_result`].
pub fn evaluate_signals(url: &Url) -> Checks {
    let host = url.host_str().unwrap_or("");
    let domain = host.to_lowercase();
    let path = url.path().to_lowercase();
    let query = url.query().unwrap_or("").to_lowercase();

    let mut checks = Checks::default();
    checks.set(
        Signal::UrlShortener,
        URL_SHORTENERS.iter().any(|s| domain.contains(s)),
    );
    checks.set(
        Signal::SuspiciousKeyword,
        SUSPICIOUS_KEYWORDS
            .iter()
            .any(|k| path.contains(k) || query.contains(k)),
    );
    checks.set(
        Signal::SuspiciousExtension,
        SUSPICIOUS_EXTENSIONS.iter().any(|ext| path.ends_with(ext)),
    );
    checks.set(
        Signal::SuspiciousDomain,
        SUSPICIOUS_DOMAINS.iter().any(|d| domain.contains(d)),
    );
    checks.set(Signal::IpAddress, is_dotted_ipv4(host));
    checks.set(
        Signal::UnusualCharacters,
        host.chars().any(|c| !(c.is_ascii_alphanumeric() || c == '.' || c == '-')),
    );
    checks
}

/// Folds a threat lookup result into `checks`.
pub fn apply_threat_result(checks: &mut Checks, result: &ThreatResult) {
    if result.has_matches() {
        checks.set(Signal::SafeBrowsingThreat, true);
        checks.threat_types = result.threat_types();
    }
}

/// Returns true for four dot-separated groups of one to three digits.
pub fn is_dotted_ipv4(host: &str) -> bool {
    let groups: Vec<&str> = host.split('.').collect();
    groups.len() == 4
        && groups
            .iter()
            .all(|g| (1..=3).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn checks_for(url: &str) -> Checks {
        evaluate_signals(&Url::parse(url).unwrap())
    }

    #[test_case("http://bit.ly/abc", Signal::UrlShortener ; "shortener")]
    #[test_case("https://tinyurl.com/x", Signal::UrlShortener ; "tinyurl")]
    #[test_case("https://example.com/free-download/tool", Signal::SuspiciousKeyword ; "keyword in path")]
    #[test_case("https://example.com/page?q=KEYGEN", Signal::SuspiciousKeyword ; "keyword in query")]
    #[test_case("https://example.com/setup.EXE", Signal::SuspiciousExtension ; "extension")]
    #[test_case("https://mirror.warez.com/", Signal::SuspiciousDomain ; "bad domain")]
    #[test_case("http://192.168.1.10/login", Signal::IpAddress ; "ipv4 host")]
    #[test_case("http://[::1]/", Signal::UnusualCharacters ; "ipv6 brackets")]
    fn test_single_signal(url: &str, expected: Signal) {
        let checks = checks_for(url);
        assert!(checks.get(expected), "{} should trigger {}", url, expected);
        assert_eq!(checks.risk_score(), 1, "{} triggered {:?}", url, checks);
    }

    #[test]
    fn test_clean_url_triggers_nothing() {
        let checks = checks_for("https://example.com/page");
        assert_eq!(checks, Checks::default());
    }

    #[test]
    fn test_signals_are_not_exclusive() {
        // Shortener, keyword, extension, and bad domain all at once.
        let checks = checks_for("http://bit.ly.warez.com/crack/setup.exe");
        assert!(checks.is_url_shortener);
        assert!(checks.has_suspicious_keyword);
        assert!(checks.has_suspicious_extension);
        assert!(checks.is_suspicious_domain);
        assert_eq!(checks.risk_score(), 4);
    }

    #[test]
    fn test_substring_matching_on_host() {
        // "t.co" is a substring of "microsoft.com".
        assert!(checks_for("https://microsoft.com/").is_url_shortener);
    }

    #[test]
    fn test_hostless_url() {
        let checks = checks_for("mailto:someone@example.com");
        assert_eq!(checks.risk_score(), 0);
    }

    #[test_case("1.2.3.4", true)]
    #[test_case("255.255.255.255", true)]
    #[test_case("1.2.3", false)]
    #[test_case("1.2.3.4.5", false)]
    #[test_case("1234.1.1.1", false)]
    #[test_case("a.b.c.d", false)]
    #[test_case("1..2.3", false)]
    fn test_is_dotted_ipv4(host: &str, expected: bool) {
        assert_eq!(is_dotted_ipv4(host), expected);
    }

    #[test]
    fn test_apply_threat_result() {
        let mut checks = Checks::default();
        apply_threat_result(&mut checks, &ThreatResult::clean());
        assert!(!checks.has_safe_browsing_threat);

        apply_threat_result(&mut checks, &ThreatResult::with_threats(["MALWARE", "SOCIAL_ENGINEERING"]));
        assert!(checks.has_safe_browsing_threat);
        assert_eq!(checks.threat_types, vec!["MALWARE", "SOCIAL_ENGINEERING"]);
        assert_eq!(checks.risk_score(), 1);
    }
}
