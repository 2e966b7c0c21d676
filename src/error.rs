//! Error types for Authgate
//!
//! This module defines the error taxonomy of the authentication gate,
//! using `thiserror` for ergonomic error handling.
//!
//! A denied user is not an error: membership failures are reported as
//! [`Decision::Forbidden`](crate::identity::Decision) so callers can tell
//! "not a member" apart from "could not check".

use thiserror::Error;

/// Main error type for Authgate operations
///
/// Every I/O failure of the gate is surfaced through one of these variants.
/// None of them is ever recovered locally: a failed identity or membership
/// check must not default to "authorized".
#[derive(Error, Debug)]
pub enum GateError {
    /// Transport failure, non-success status, or unreadable body on the
    /// profile endpoint
    #[error("Failed to get oauth user info from {url}: {source}")]
    IdentityFetchFailed {
        /// The profile endpoint that was called
        url: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// Profile response body was not a JSON object
    #[error("Failed to decode user profile response: {0}")]
    ProfileDecodeFailed(String),

    /// A page of the group listing could not be fetched or decoded
    #[error("Failed to get groups (page {page}): {reason}")]
    GroupFetchFailed {
        /// 1-based number of the page that failed
        page: usize,
        /// Description of the failure
        reason: String,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The authenticated HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Result type alias for application-level Authgate operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation in
/// configuration loading and command handlers.
pub type Result<T> = anyhow::Result<T>;

/// Result type alias for gate operations whose failures callers match on
pub type GateResult<T> = std::result::Result<T, GateError>;
