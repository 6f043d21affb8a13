//! # LinkGuard Scanner
//!
//! Risk scoring for hyperlinks.
//!
//! ## Features
//!
//! - **Heuristic Signals**: shorteners, keywords, extensions, bad domains,
//!   raw IPv4 hosts, and unusual host characters
//! - **Threat Lookup**: Safe Browsing matches, served through the lookup cache
//! - **Coalesced Lookups**: concurrent analyses of one URL share a single fetch
//! - **Batch Inspection**: a capped, concurrent pass over a page's links
//!
//! ## Example
//!
//! ```rust,ignore
//! use linkguard_scanner::LinkAnalyzer;
//!
//! let analyzer = LinkAnalyzer::new(cache, lookup);
//! let verdict = analyzer.analyze("http://bit.ly/abc").await;
//!
//! assert!(!verdict.safe);
//! assert!(verdict.message.contains("Risk Score: 1/7"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod analyzer;
mod batch;
mod message;
mod signals;

pub use analyzer::LinkAnalyzer;
pub use batch::{BatchDetails, BatchVerdict, LinkReport};
pub use message::render_message;
pub use signals::{apply_threat_result, evaluate_signals, is_dotted_ipv4};
