//! Error types for friction-core operations.
//!
//! There is no `Unauthorized` variant: a 401 is a remote outcome
//! (see [`crate::remote::RemoteOutcome`]) that the controller turns into a
//! session clear, and callers only ever see [`SyncError::NoSession`].

use std::path::PathBuf;
use std::time::Duration;

use friction_protocol::{ReviewAction, StatusFilter};

/// All errors that can occur in friction-core operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    // ─────────────────────────────────────────────────────────────────────
    // Session Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Token must not be empty")]
    InvalidToken,

    #[error("No active session")]
    NoSession,

    // ─────────────────────────────────────────────────────────────────────
    // Capture Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Capture rate limited; retry in {}ms", retry_in.as_millis())]
    RateLimited { retry_in: Duration },

    #[error("Nothing to capture")]
    EmptyCapture,

    // ─────────────────────────────────────────────────────────────────────
    // Review Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Action {action} is not available in the {filter} view")]
    InvalidTransition {
        action: ReviewAction,
        filter: StatusFilter,
    },

    // ─────────────────────────────────────────────────────────────────────
    // Remote Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Remote request failed: {0}")]
    Transient(String),

    #[error("HTTP client setup failed: {0}")]
    HttpClient(#[source] reqwest::Error),

    // ─────────────────────────────────────────────────────────────────────
    // Storage Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Configuration write failed: {path}: {source}")]
    ConfigWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using SyncError.
pub type Result<T> = std::result::Result<T, SyncError>;

impl SyncError {
    /// True for errors raised before any network call was made.
    pub fn is_local_rejection(&self) -> bool {
        matches!(
            self,
            SyncError::InvalidToken
                | SyncError::EmptyCapture
                | SyncError::RateLimited { .. }
                | SyncError::InvalidTransition { .. }
        )
    }
}
