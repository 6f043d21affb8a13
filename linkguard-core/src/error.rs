//! Error types for LinkGuard.
//!
//! One error enum for the whole workspace, built with `thiserror`.
//! Most of these are recovered locally: the analyzer falls back to local
//! signals when a lookup fails and the cache logs persistence failures.

use thiserror::Error;

/// Result type alias using `LinkGuardError`.
pub type Result<T> = std::result::Result<T, LinkGuardError>;

/// Main error type for all LinkGuard operations.
#[derive(Debug, Error)]
pub enum LinkGuardError {
    // ═══════════════════════════════════════════════════════════════════════════
    // LOOKUP ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The threat lookup service answered with an error or an unreadable body.
    #[error("Threat lookup failed for '{url}': {reason}")]
    LookupFailed {
        /// URL that was looked up
        url: String,
        /// What went wrong
        reason: String,
    },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // STORAGE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The persistent store could not be read or written.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // TRANSPORT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The inspection service could not be reached after every retry.
    #[error("Could not connect to the inspection service after {attempts} attempt(s). Please retry.")]
    ChannelUnavailable {
        /// Attempts made, the first included
        attempts: u32,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION / INTERNAL
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal invariant violation (should never happen).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl LinkGuardError {
    /// Returns true if this error is transient and the call may be retried.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LinkGuardError::HttpError(_)
                | LinkGuardError::LookupFailed { .. }
                | LinkGuardError::ChannelUnavailable { .. }
        )
    }

    /// Returns true if this error came from the persistent store.
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            LinkGuardError::StorageError(_) | LinkGuardError::IoError(_) | LinkGuardError::JsonError(_)
        )
    }
}
