//! # LinkGuard Core
//!
//! Core types, errors, and traits shared by every LinkGuard crate.
//!
//! - **Types**: links, threat lookup results, verdicts, and cache statistics
//! - **Errors**: a single error enum with classification helpers
//! - **Constants**: cache defaults, the batch cap, and the heuristic reference sets
//! - **Traits**: seams for persistence, threat lookups, link sources, and clocks
//!
//! ## Example
//!
//! ```rust
//! use linkguard_core::{Signal, ThreatResult};
//!
//! // The risk score denominator tracks the signal catalog.
//! assert_eq!(Signal::ALL.len(), 7);
//!
//! let empty: ThreatResult = serde_json::from_str("{}").unwrap();
//! assert!(!empty.has_matches());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{LinkGuardError, Result};
pub use traits::*;
pub use types::*;
