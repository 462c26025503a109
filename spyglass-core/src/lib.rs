//! Spyglass Core - Query interpretation and shared configuration

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Provides the pure query-interpretation pipeline (title/year splitting,
//! intent detection, fuzzy candidate matching) together with configuration,
//! settings sealing, and tracing setup shared by every Spyglass component.

pub mod config;
pub mod crypto;
pub mod query;
pub mod settings;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::SpyglassConfig;
pub use crypto::{CryptoError, SettingsSealer};
pub use query::{
    Candidate, MediaIntent, ScoredMatch, YearMode, detect_media_intent, is_specific_title_query,
    match_candidates, sequence_ratio, split_title_year,
};
pub use settings::UserSettings;

/// Core errors that can bubble up from any Spyglass subsystem.
#[derive(Debug, thiserror::Error)]
pub enum SpyglassError {
    /// Settings token could not be sealed or unsealed.
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Invalid or incomplete configuration.
    #[error("Configuration error: {reason}")]
    Configuration {
        /// The reason the configuration was rejected
        reason: String,
    },

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The addon web server failed to start or crashed.
    #[error("Web server error: {reason}")]
    WebServer {
        /// The reason the server failed
        reason: String,
    },
}

impl SpyglassError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            SpyglassError::Crypto(_) => "Settings token is invalid or corrupted".to_string(),
            SpyglassError::Configuration { reason } => {
                format!("Configuration error: {reason}")
            }
            SpyglassError::Io(_) => "File system error occurred".to_string(),
            SpyglassError::WebServer { reason } => format!("Web server error: {reason}"),
        }
    }
}

/// Convenience type alias for Results with SpyglassError.
pub type Result<T> = std::result::Result<T, SpyglassError>;
