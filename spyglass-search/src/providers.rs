//! Provider traits for metadata lookup and title suggestions.
//!
//! The discovery pipeline only sees these traits, so tests and development
//! setups can swap the real TMDB/LLM clients for in-memory fakes.

use async_trait::async_trait;
use spyglass_core::query::{MediaIntent, ScoredMatch};

use crate::tmdb::{ExternalIds, MovieDetails, MovieResult, SeriesDetails, SeriesResult, TmdbClient};

/// Trait for metadata search providers.
///
/// Search operations return the ranked match set for a title; lookups that
/// fail upstream surface as empty results or `None`, never as errors.
#[async_trait]
pub trait MetadataProvider: Send + Sync + std::fmt::Debug {
    /// Searches movies by title and optional release year.
    async fn search_movies(&self, title: &str, year: Option<u16>)
    -> Vec<ScoredMatch<MovieResult>>;

    /// Searches series by title and optional first-air year.
    async fn search_series(
        &self,
        title: &str,
        year: Option<u16>,
    ) -> Vec<ScoredMatch<SeriesResult>>;

    /// Fetches movie details with external ids.
    async fn movie_details(&self, id: u64) -> Option<MovieDetails>;

    /// Fetches series details with external ids.
    async fn series_details(&self, id: u64) -> Option<SeriesDetails>;
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    async fn search_movies(
        &self,
        title: &str,
        year: Option<u16>,
    ) -> Vec<ScoredMatch<MovieResult>> {
        TmdbClient::search_movies(self, title, year).await
    }

    async fn search_series(
        &self,
        title: &str,
        year: Option<u16>,
    ) -> Vec<ScoredMatch<SeriesResult>> {
        TmdbClient::search_series(self, title, year).await
    }

    async fn movie_details(&self, id: u64) -> Option<MovieDetails> {
        TmdbClient::movie_details(self, id).await
    }

    async fn series_details(&self, id: u64) -> Option<SeriesDetails> {
        TmdbClient::series_details(self, id).await
    }
}

/// Trait for title suggestion backends.
#[async_trait]
pub trait TitleSuggester: Send + Sync + std::fmt::Debug {
    /// Produces up to `count` `(title, year)` suggestions for a query.
    async fn suggest(
        &self,
        query: &str,
        intent: MediaIntent,
        count: usize,
    ) -> Vec<(String, Option<u16>)>;
}

#[async_trait]
impl TitleSuggester for crate::llm::SuggestionClient {
    async fn suggest(
        &self,
        query: &str,
        intent: MediaIntent,
        count: usize,
    ) -> Vec<(String, Option<u16>)> {
        self.suggest_titles(query, intent, count).await
    }
}

/// In-memory provider for tests and development.
///
/// Holds canned search results and runs them through the same candidate
/// matcher as the real client, so ranking behavior matches production.
#[derive(Debug, Default, Clone)]
pub struct MockProvider {
    movies: Vec<MovieResult>,
    series: Vec<SeriesResult>,
}

impl MockProvider {
    /// Creates an empty provider; every lookup returns nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds canned movie results returned (and matched) for every search.
    #[must_use]
    pub fn with_movies(mut self, movies: Vec<MovieResult>) -> Self {
        self.movies = movies;
        self
    }

    /// Adds canned series results returned (and matched) for every search.
    #[must_use]
    pub fn with_series(mut self, series: Vec<SeriesResult>) -> Self {
        self.series = series;
        self
    }
}

#[async_trait]
impl MetadataProvider for MockProvider {
    async fn search_movies(
        &self,
        title: &str,
        _year: Option<u16>,
    ) -> Vec<ScoredMatch<MovieResult>> {
        spyglass_core::query::match_candidates(title, self.movies.clone())
    }

    async fn search_series(
        &self,
        title: &str,
        _year: Option<u16>,
    ) -> Vec<ScoredMatch<SeriesResult>> {
        spyglass_core::query::match_candidates(title, self.series.clone())
    }

    async fn movie_details(&self, id: u64) -> Option<MovieDetails> {
        let found = self.movies.iter().find(|movie| movie.id == id)?;
        Some(MovieDetails {
            id: found.id,
            title: found.title.clone(),
            imdb_id: Some(format!("tt{:07}", found.id)),
            external_ids: None,
        })
    }

    async fn series_details(&self, id: u64) -> Option<SeriesDetails> {
        let found = self.series.iter().find(|series| series.id == id)?;
        Some(SeriesDetails {
            id: found.id,
            name: found.name.clone(),
            external_ids: Some(ExternalIds {
                imdb_id: Some(format!("tt{:07}", found.id)),
            }),
        })
    }
}

/// Fixed suggestion list for tests and development.
#[derive(Debug, Default, Clone)]
pub struct MockSuggester {
    suggestions: Vec<(String, Option<u16>)>,
}

impl MockSuggester {
    /// Creates a suggester that always returns `suggestions` (capped at the
    /// requested count).
    pub fn new(suggestions: Vec<(String, Option<u16>)>) -> Self {
        Self { suggestions }
    }
}

#[async_trait]
impl TitleSuggester for MockSuggester {
    async fn suggest(
        &self,
        _query: &str,
        _intent: MediaIntent,
        count: usize,
    ) -> Vec<(String, Option<u16>)> {
        self.suggestions.iter().take(count).cloned().collect()
    }
}
