//! Human-readable verdict messages.

use std::fmt::Write;

use linkguard_core::types::{Checks, Signal};

/// Renders the explanation for a verdict.
///
/// Triggered signals are listed in catalog order, threat types are indented
/// under the Safe Browsing line, and the score is reported out of the catalog
/// size. A URL with no triggered signal gets a single sentence.
pub fn render_message(domain: &str, checks: &Checks) -> String {
    let risk_score = checks.risk_score();
    if risk_score == 0 {
        return format!("✅ {} appears to be safe. No suspicious patterns detected.", domain);
    }

    let mut message = format!("Analysis of {}:\n", domain);
    for signal in checks.triggered() {
        let _ = writeln!(message, "⚠️ {}", signal.warning());
        if signal == Signal::SafeBrowsingThreat {
            for threat in &checks.threat_types {
                let _ = writeln!(message, "  - {}", threat);
            }
        }
    }
    let _ = write!(
        message,
        "\nRisk Score: {}/{} - Proceed with caution.",
        risk_score,
        Signal::count()
    );
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_message() {
        assert_eq!(
            render_message("example.com", &Checks::default()),
            "✅ example.com appears to be safe. No suspicious patterns detected."
        );
    }

    #[test]
    fn test_single_signal_message() {
        let checks = Checks {
            is_url_shortener: true,
            ..Default::default()
        };
        assert_eq!(
            render_message("bit.ly", &checks),
            "Analysis of bit.ly:\n⚠️ Contains URL shortener\n\nRisk Score: 1/7 - Proceed with caution."
        );
    }

    #[test]
    fn test_golden_message_with_threats() {
        let checks = Checks {
            has_unusual_characters: true,
            has_ip_address: true,
            has_safe_browsing_threat: true,
            threat_types: vec!["MALWARE".into(), "SOCIAL_ENGINEERING".into()],
            ..Default::default()
        };
        let expected = "Analysis of 10.0.0.1:\n\
                        ⚠️ Uses IP address instead of domain name\n\
                        ⚠️ Contains unusual characters in domain\n\
                        ⚠️ Google Safe Browsing detected threats:\n  - MALWARE\n  - SOCIAL_ENGINEERING\n\
                        \nRisk Score: 3/7 - Proceed with caution.";
        assert_eq!(render_message("10.0.0.1", &checks), expected);
    }
}
