//! Spyglass Search - Metadata lookup and AI-assisted discovery

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Turns free-text requests into ranked catalog entries: TMDB lookups for
//! specific titles, language-model suggestions for discovery queries, and a
//! rating-poster overlay for artwork. All scoring and filtering runs through
//! the query core in `spyglass-core`.

pub mod discovery;
pub mod errors;
pub mod llm;
pub mod providers;
pub mod ratings;
pub mod tmdb;

// Re-export main types
pub use discovery::{CatalogEntry, CatalogKind, DiscoveryService};
pub use errors::SearchError;
pub use llm::SuggestionClient;
pub use providers::{MetadataProvider, TitleSuggester};
pub use ratings::PosterOverlay;
pub use tmdb::TmdbClient;

/// Convenience type alias for Results with SearchError.
pub type Result<T> = std::result::Result<T, SearchError>;
