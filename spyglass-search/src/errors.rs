//! Error types for metadata lookup and discovery.

use thiserror::Error;

/// Errors that can occur while talking to external lookup services.
///
/// Public lookup operations degrade to empty results instead of surfacing
/// these; the variants exist so the internal request paths can log precisely
/// what went wrong.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Request exceeded the configured timeout.
    #[error("Request to {endpoint} timed out")]
    Timeout {
        /// The endpoint that timed out
        endpoint: String,
    },

    /// Network communication failed.
    #[error("Network error: {reason}")]
    Network {
        /// The reason for the network error
        reason: String,
    },

    /// Credentials were rejected by the upstream service.
    #[error("Authentication failed for {endpoint}")]
    Authentication {
        /// The endpoint that rejected the credentials
        endpoint: String,
    },

    /// Upstream returned a non-success status.
    #[error("Upstream returned HTTP {status} for {endpoint}")]
    UpstreamStatus {
        /// The HTTP status code returned
        status: u16,
        /// The endpoint that returned it
        endpoint: String,
    },

    /// Response body could not be parsed.
    #[error("Parse error: {reason}")]
    Parse {
        /// The reason parsing failed
        reason: String,
    },

    /// A configured base URL is not a valid URL.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected URL
        url: String,
        /// The reason it was rejected
        reason: String,
    },

    /// The language model returned an unusable completion.
    #[error("Suggestion request failed: {reason}")]
    Suggestion {
        /// The reason the completion was unusable
        reason: String,
    },
}
