//! End-to-end query pipeline tests over in-memory providers.

use std::sync::Arc;

use spyglass_core::config::SpyglassConfig;
use spyglass_search::discovery::{CatalogKind, DiscoveryService};
use spyglass_search::providers::{MockProvider, MockSuggester};
use spyglass_search::ratings::PosterOverlay;
use spyglass_search::tmdb::{MovieResult, SeriesResult};
use spyglass_web::stremio::Meta;

fn movie(id: u64, title: &str, date: &str) -> MovieResult {
    MovieResult {
        id,
        title: Some(title.to_string()),
        release_date: Some(date.to_string()),
        overview: Some(format!("Overview of {title}")),
        poster_path: Some(format!("/{id}.jpg")),
        vote_average: Some(8.0),
    }
}

fn series(id: u64, name: &str, date: &str) -> SeriesResult {
    SeriesResult {
        id,
        name: Some(name.to_string()),
        first_air_date: Some(date.to_string()),
        overview: None,
        poster_path: Some(format!("/{id}.jpg")),
        vote_average: Some(8.5),
    }
}

#[tokio::test]
async fn specific_lookup_flows_into_wire_metas() {
    let provider = MockProvider::new().with_movies(vec![
        movie(603, "The Matrix", "1999-03-30"),
        movie(604, "The Matrix Reloaded", "2003-05-15"),
    ]);
    let discovery = DiscoveryService::new(
        Arc::new(provider),
        Arc::new(MockSuggester::default()),
        20,
    );

    let entries = discovery
        .resolve("The Matrix 1999", CatalogKind::Movie, 10)
        .await;
    assert!(!entries.is_empty());
    assert_eq!(entries[0].tmdb_id, 603);

    let config = SpyglassConfig::default();
    let overlay = PosterOverlay::new(&config.tmdb, &config.ratings);

    // Without a ratings key the poster comes from TMDB.
    let poster = overlay.select(None, entries[0].imdb_id.as_deref(), entries[0].poster_path.as_deref());
    let meta = Meta::from_entry(&entries[0], poster);
    assert_eq!(meta.id, "tt0000603");
    assert_eq!(meta.poster.as_deref(), Some("https://image.tmdb.org/t/p/w500/603.jpg"));
    assert_eq!(meta.release_info.as_deref(), Some("1999"));

    // With a ratings key and a known IMDB id the overlay takes over.
    let poster = overlay.select(Some("k0"), entries[0].imdb_id.as_deref(), entries[0].poster_path.as_deref());
    let meta = Meta::from_entry(&entries[0], poster);
    assert_eq!(
        meta.poster.as_deref(),
        Some("https://api.ratingposterdb.com/k0/imdb/poster-default/tt0000603.jpg")
    );
}

#[tokio::test]
async fn discovery_request_goes_through_suggestions() {
    let provider = MockProvider::new().with_series(vec![
        series(1396, "Breaking Bad", "2008-01-20"),
        series(60059, "Better Call Saul", "2015-02-08"),
    ]);
    let suggester = MockSuggester::new(vec![
        ("Better Call Saul".to_string(), Some(2015)),
        ("Breaking Bad".to_string(), Some(2008)),
        ("A Show Nobody Made".to_string(), None),
    ]);
    let discovery = DiscoveryService::new(Arc::new(provider), Arc::new(suggester), 20);

    let entries = discovery
        .resolve("gripping crime shows", CatalogKind::Series, 10)
        .await;

    let ids: Vec<u64> = entries.iter().map(|e| e.tmdb_id).collect();
    assert_eq!(ids, vec![60059, 1396]);
    assert!(entries.iter().all(|e| e.kind == CatalogKind::Series));
    assert!(entries.iter().all(|e| e.imdb_id.is_some()));
}

#[tokio::test]
async fn conflicting_medium_produces_no_entries() {
    let provider = MockProvider::new().with_movies(vec![movie(603, "The Matrix", "1999-03-30")]);
    let suggester = MockSuggester::new(vec![("The Matrix".to_string(), None)]);
    let discovery = DiscoveryService::new(Arc::new(provider), Arc::new(suggester), 20);

    // A movie-flavored query must not fill the series catalog.
    let entries = discovery
        .resolve("best action movies", CatalogKind::Series, 10)
        .await;
    assert!(entries.is_empty());
}

#[tokio::test]
async fn hallucinated_titles_never_reach_the_catalog() {
    let provider = MockProvider::new().with_movies(vec![movie(603, "The Matrix", "1999-03-30")]);
    let suggester = MockSuggester::new(vec![
        ("Entirely Fabricated Blockbuster".to_string(), Some(2020)),
        ("The Matrix".to_string(), Some(1999)),
    ]);
    let discovery = DiscoveryService::new(Arc::new(provider), Arc::new(suggester), 20);

    let entries = discovery
        .resolve("cult classic movies", CatalogKind::Movie, 10)
        .await;

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].tmdb_id, 603);
}
