//! Error types for the sponsor metadata cache.
//!
//! None of these ever fail a connection: the manager logs them and the
//! session proceeds without sponsor data.

use thiserror::Error;

use crate::types::UserId;

/// Result type alias using `SponsorsError`.
pub type Result<T> = std::result::Result<T, SponsorsError>;

/// Main error type for all sponsor operations.
#[derive(Debug, Error)]
pub enum SponsorsError {
    // ═══════════════════════════════════════════════════════════════════════════
    // REMOTE API ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The API answered with a status other than 200 or 404.
    #[error("Sponsors API returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The response body could not be read.
    #[error("Invalid sponsor response: {0}")]
    InvalidResponse(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // NETWORK ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// HTTP request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Request exceeded the configured timeout.
    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    // ═══════════════════════════════════════════════════════════════════════════
    // SESSION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A connect arrived for a user whose previous session never disconnected.
    #[error("Session already registered for user {0}")]
    DuplicateSession(UserId),

    /// The manager's event loop was started twice.
    #[error("Sponsors manager already initialized")]
    AlreadyInitialized,

    // ═══════════════════════════════════════════════════════════════════════════
    // INPUT & CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Could not parse a user identifier.
    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Response body was not a sponsor record.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl SponsorsError {
    /// Returns true if the failure is transient and a later connect may succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SponsorsError::HttpError(_)
                | SponsorsError::Timeout { .. }
                | SponsorsError::UnexpectedStatus { .. }
        )
    }

    /// Returns true if the error originated from the remote API or its transport.
    pub fn is_remote_error(&self) -> bool {
        matches!(
            self,
            SponsorsError::UnexpectedStatus { .. }
                | SponsorsError::InvalidResponse(_)
                | SponsorsError::HttpError(_)
                | SponsorsError::Timeout { .. }
                | SponsorsError::JsonError(_)
        )
    }
}
