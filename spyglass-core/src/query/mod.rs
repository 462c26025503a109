//! Query interpretation pipeline.
//!
//! Pure, synchronous functions that read a free-text media request: splitting
//! a trailing year off a title, deciding whether the request names a specific
//! work or describes a taste, detecting whether it asks for movies or series,
//! and matching a possibly-imprecise title against provider search results.
//! Nothing here performs I/O or retains state across calls.

pub mod intent;
pub mod matcher;
pub mod normalize;
pub mod similarity;

pub use intent::{MediaIntent, detect_media_intent, is_specific_title_query};
pub use matcher::{Candidate, MAX_MATCHES, ScoredMatch, match_candidates};
pub use normalize::{YearMode, split_title_year};
pub use similarity::sequence_ratio;
