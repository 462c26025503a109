//! Lookup orchestration: from a raw query to ranked catalog entries.
//!
//! Decides how to read a query (specific title vs. discovery request,
//! movie vs. series), fans the resulting lookups out against the metadata
//! provider, and folds the ranked matches into catalog entries. The pure
//! judgements all live in the query core; this module just wires them to
//! the providers.

use std::sync::Arc;

use futures::future::join_all;
use spyglass_core::query::{
    MediaIntent, ScoredMatch, YearMode, detect_media_intent, is_specific_title_query,
    split_title_year,
};
use tracing::debug;

use crate::providers::{MetadataProvider, TitleSuggester};
use crate::tmdb::{MovieResult, SeriesResult};

/// Which catalog a request addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    /// The movie catalog.
    Movie,
    /// The series catalog.
    Series,
}

impl CatalogKind {
    /// Stremio type string for this catalog.
    pub fn as_str(self) -> &'static str {
        match self {
            CatalogKind::Movie => "movie",
            CatalogKind::Series => "series",
        }
    }

    /// Parses a Stremio type string.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(CatalogKind::Movie),
            "series" => Some(CatalogKind::Series),
            _ => None,
        }
    }

    fn as_intent(self) -> MediaIntent {
        match self {
            CatalogKind::Movie => MediaIntent::Movie,
            CatalogKind::Series => MediaIntent::Series,
        }
    }
}

/// One resolved catalog entry, ready for wire serialization.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// TMDB id of the matched title.
    pub tmdb_id: u64,
    /// Which catalog the entry belongs to.
    pub kind: CatalogKind,
    /// Display title.
    pub title: String,
    /// Release / first-air year.
    pub year: Option<u16>,
    /// Plot overview.
    pub overview: Option<String>,
    /// TMDB poster path fragment.
    pub poster_path: Option<String>,
    /// IMDB id, filled by enrichment when TMDB knows it.
    pub imdb_id: Option<String>,
    /// Community rating, 0-10.
    pub rating: Option<f64>,
    /// Match score against the query or suggestion title.
    pub score: f64,
}

impl CatalogEntry {
    fn from_movie(matched: ScoredMatch<MovieResult>) -> Self {
        let year = matched.candidate.release_year();
        Self {
            tmdb_id: matched.candidate.id,
            kind: CatalogKind::Movie,
            title: matched.candidate.title.unwrap_or_default(),
            year,
            overview: matched.candidate.overview,
            poster_path: matched.candidate.poster_path,
            imdb_id: None,
            rating: matched.candidate.vote_average,
            score: matched.score,
        }
    }

    fn from_series(matched: ScoredMatch<SeriesResult>) -> Self {
        let year = matched.candidate.release_year();
        Self {
            tmdb_id: matched.candidate.id,
            kind: CatalogKind::Series,
            title: matched.candidate.name.unwrap_or_default(),
            year,
            overview: matched.candidate.overview,
            poster_path: matched.candidate.poster_path,
            imdb_id: None,
            rating: matched.candidate.vote_average,
            score: matched.score,
        }
    }
}

/// Resolves queries into catalog entries via the injected providers.
#[derive(Debug, Clone)]
pub struct DiscoveryService {
    provider: Arc<dyn MetadataProvider>,
    suggester: Arc<dyn TitleSuggester>,
    suggestion_count: usize,
}

impl DiscoveryService {
    /// Creates a service over a metadata provider and a title suggester.
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        suggester: Arc<dyn TitleSuggester>,
        suggestion_count: usize,
    ) -> Self {
        Self {
            provider,
            suggester,
            suggestion_count,
        }
    }

    /// Resolves a search query for one catalog.
    ///
    /// Queries whose detected medium contradicts the catalog resolve to
    /// nothing, so a series search never pollutes the movie catalog.
    /// Specific titles go straight to the provider; discovery requests go
    /// through the suggester first. At most `limit` entries come back,
    /// enriched with IMDB ids.
    pub async fn resolve(&self, query: &str, kind: CatalogKind, limit: usize) -> Vec<CatalogEntry> {
        match detect_media_intent(query) {
            MediaIntent::Unknown => {}
            intent if intent == kind.as_intent() => {}
            _ => {
                debug!("Query '{query}' asks for the other medium, skipping {} catalog", kind.as_str());
                return Vec::new();
            }
        }

        let mut entries = if is_specific_title_query(query) {
            self.resolve_specific(query, kind).await
        } else {
            self.resolve_discovery(query, kind).await
        };

        entries.truncate(limit);
        self.enrich(&mut entries).await;
        entries
    }

    /// Builds the default browse feed for one catalog.
    pub async fn default_feed(&self, kind: CatalogKind, limit: usize) -> Vec<CatalogEntry> {
        let prompt = match kind {
            CatalogKind::Movie => "widely acclaimed movies worth watching right now",
            CatalogKind::Series => "widely acclaimed TV series worth watching right now",
        };

        let mut entries = self.resolve_discovery(prompt, kind).await;
        entries.truncate(limit);
        self.enrich(&mut entries).await;
        entries
    }

    /// One provider search for a literal title, keeping the whole match set.
    async fn resolve_specific(&self, query: &str, kind: CatalogKind) -> Vec<CatalogEntry> {
        let (title, year) = split_title_year(query, YearMode::ParenthesizedThenTrailing);
        debug!("Specific lookup for '{title}' (year: {year:?})");

        match kind {
            CatalogKind::Movie => self
                .provider
                .search_movies(&title, year)
                .await
                .into_iter()
                .map(CatalogEntry::from_movie)
                .collect(),
            CatalogKind::Series => self
                .provider
                .search_series(&title, year)
                .await
                .into_iter()
                .map(CatalogEntry::from_series)
                .collect(),
        }
    }

    /// Suggestion-driven resolution: one provider lookup per suggested
    /// title, best match per suggestion, deduplicated by TMDB id in
    /// suggestion order.
    async fn resolve_discovery(&self, query: &str, kind: CatalogKind) -> Vec<CatalogEntry> {
        let suggestions = self
            .suggester
            .suggest(query, kind.as_intent(), self.suggestion_count)
            .await;
        debug!("Resolving {} suggestions for '{query}'", suggestions.len());

        let lookups = suggestions.into_iter().map(|(title, year)| {
            let provider = Arc::clone(&self.provider);
            let kind = kind;
            async move {
                match kind {
                    CatalogKind::Movie => provider
                        .search_movies(&title, year)
                        .await
                        .into_iter()
                        .next()
                        .map(CatalogEntry::from_movie),
                    CatalogKind::Series => provider
                        .search_series(&title, year)
                        .await
                        .into_iter()
                        .next()
                        .map(CatalogEntry::from_series),
                }
            }
        });

        let mut seen_ids = std::collections::HashSet::new();
        join_all(lookups)
            .await
            .into_iter()
            .flatten()
            .filter(|entry| seen_ids.insert(entry.tmdb_id))
            .collect()
    }

    /// Fills IMDB ids in, one details lookup per entry.
    async fn enrich(&self, entries: &mut [CatalogEntry]) {
        let details = join_all(entries.iter().map(|entry| {
            let provider = Arc::clone(&self.provider);
            let (tmdb_id, kind) = (entry.tmdb_id, entry.kind);
            async move {
                match kind {
                    CatalogKind::Movie => provider
                        .movie_details(tmdb_id)
                        .await
                        .and_then(|d| d.imdb_ref().map(str::to_string)),
                    CatalogKind::Series => provider
                        .series_details(tmdb_id)
                        .await
                        .and_then(|d| d.imdb_ref().map(str::to_string)),
                }
            }
        }))
        .await;

        for (entry, imdb_id) in entries.iter_mut().zip(details) {
            entry.imdb_id = imdb_id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{MockProvider, MockSuggester};

    fn movie(id: u64, title: &str, date: &str) -> MovieResult {
        MovieResult {
            id,
            title: Some(title.to_string()),
            release_date: Some(date.to_string()),
            overview: Some(format!("About {title}")),
            poster_path: Some(format!("/{id}.jpg")),
            vote_average: Some(7.5),
        }
    }

    fn series(id: u64, name: &str, date: &str) -> SeriesResult {
        SeriesResult {
            id,
            name: Some(name.to_string()),
            first_air_date: Some(date.to_string()),
            overview: None,
            poster_path: None,
            vote_average: None,
        }
    }

    fn service(provider: MockProvider, suggester: MockSuggester) -> DiscoveryService {
        DiscoveryService::new(Arc::new(provider), Arc::new(suggester), 20)
    }

    #[tokio::test]
    async fn test_specific_query_skips_the_suggester() {
        let provider = MockProvider::new().with_movies(vec![movie(603, "The Matrix", "1999-03-30")]);
        // A suggester that would pollute the result if consulted.
        let suggester = MockSuggester::new(vec![("Finding Nemo".to_string(), Some(2003))]);

        let entries = service(provider, suggester)
            .resolve("The Matrix (1999)", CatalogKind::Movie, 10)
            .await;

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].tmdb_id, 603);
        assert_eq!(entries[0].year, Some(1999));
        assert_eq!(entries[0].score, 1.0);
    }

    #[tokio::test]
    async fn test_discovery_query_resolves_suggestions_in_order() {
        let provider = MockProvider::new().with_movies(vec![
            movie(603, "The Matrix", "1999-03-30"),
            movie(27205, "Inception", "2010-07-15"),
        ]);
        let suggester = MockSuggester::new(vec![
            ("Inception".to_string(), Some(2010)),
            ("The Matrix".to_string(), Some(1999)),
            ("Inception".to_string(), Some(2010)),
        ]);

        let entries = service(provider, suggester)
            .resolve("mind-bending sci-fi movies", CatalogKind::Movie, 10)
            .await;

        let ids: Vec<u64> = entries.iter().map(|e| e.tmdb_id).collect();
        assert_eq!(ids, vec![27205, 603]);
    }

    #[tokio::test]
    async fn test_cross_medium_query_resolves_to_nothing() {
        let provider = MockProvider::new().with_movies(vec![movie(603, "The Matrix", "1999-03-30")]);
        let suggester = MockSuggester::new(vec![("The Matrix".to_string(), None)]);

        let entries = service(provider, suggester)
            .resolve("best tv series about hackers", CatalogKind::Movie, 10)
            .await;

        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_series_catalog_uses_series_lookup() {
        let provider =
            MockProvider::new().with_series(vec![series(1396, "Breaking Bad", "2008-01-20")]);
        let suggester = MockSuggester::new(vec![("Breaking Bad".to_string(), Some(2008))]);

        let entries = service(provider, suggester)
            .resolve("shows like breaking bad", CatalogKind::Series, 10)
            .await;

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, CatalogKind::Series);
        assert_eq!(entries[0].imdb_id.as_deref(), Some("tt0001396"));
    }

    #[tokio::test]
    async fn test_unmatched_suggestions_drop_out() {
        let provider = MockProvider::new().with_movies(vec![movie(603, "The Matrix", "1999-03-30")]);
        let suggester = MockSuggester::new(vec![
            ("A Completely Invented Title".to_string(), None),
            ("The Matrix".to_string(), Some(1999)),
        ]);

        let entries = service(provider, suggester)
            .resolve("great movies", CatalogKind::Movie, 10)
            .await;

        let ids: Vec<u64> = entries.iter().map(|e| e.tmdb_id).collect();
        assert_eq!(ids, vec![603]);
    }

    #[tokio::test]
    async fn test_limit_applies_before_enrichment() {
        let provider = MockProvider::new().with_movies(vec![
            movie(1, "Halloween", "1978-10-25"),
            movie(2, "Halloween II", "1981-10-30"),
        ]);
        let suggester = MockSuggester::new(vec![
            ("Halloween".to_string(), None),
            ("Halloween II".to_string(), None),
        ]);

        let entries = service(provider, suggester)
            .resolve("slasher movies", CatalogKind::Movie, 1)
            .await;

        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_default_feed_comes_from_suggestions() {
        let provider = MockProvider::new().with_movies(vec![movie(603, "The Matrix", "1999-03-30")]);
        let suggester = MockSuggester::new(vec![("The Matrix".to_string(), Some(1999))]);

        let entries = service(provider, suggester)
            .default_feed(CatalogKind::Movie, 10)
            .await;

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].imdb_id.as_deref(), Some("tt0000603"));
    }

    #[tokio::test]
    async fn test_empty_provider_yields_empty_catalog() {
        let suggester = MockSuggester::new(vec![("Anything".to_string(), None)]);

        let entries = service(MockProvider::new(), suggester)
            .resolve("The Matrix", CatalogKind::Movie, 10)
            .await;

        assert!(entries.is_empty());
    }
}
