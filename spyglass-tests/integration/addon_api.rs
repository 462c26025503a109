//! Addon HTTP surface tests, driving the router in-process.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use spyglass_core::config::SpyglassConfig;
use spyglass_core::crypto::SettingsSealer;
use spyglass_core::settings::UserSettings;
use spyglass_search::discovery::{CatalogEntry, CatalogKind};
use spyglass_web::server::{AppState, CatalogBackend, router};
use tower::ServiceExt;

/// Canned backend: serves a fixed entry and counts build calls.
#[derive(Debug, Default)]
struct CannedBackend {
    builds: AtomicUsize,
}

#[async_trait]
impl CatalogBackend for CannedBackend {
    async fn build(
        &self,
        _settings: &UserSettings,
        kind: CatalogKind,
        search: Option<&str>,
        _limit: usize,
    ) -> Vec<CatalogEntry> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        vec![CatalogEntry {
            tmdb_id: 603,
            kind,
            title: search.unwrap_or("Browse Pick").to_string(),
            year: Some(1999),
            overview: None,
            poster_path: Some("/603.jpg".to_string()),
            imdb_id: Some("tt0133093".to_string()),
            rating: Some(8.2),
            score: 1.0,
        }]
    }
}

fn test_state() -> (AppState, Arc<CannedBackend>, String) {
    let config = SpyglassConfig::for_testing();
    let backend = Arc::new(CannedBackend::default());
    let state = AppState::new(config.clone(), backend.clone());

    let sealer = SettingsSealer::new(&config.http.seal_secret);
    let token = sealer.seal(&UserSettings::for_testing()).unwrap();

    (state, backend, token)
}

async fn get_json(state: AppState, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router(state)
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

#[tokio::test]
async fn health_endpoint_responds() {
    let (state, _, _) = test_state();
    let (status, body) = get_json(state, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unconfigured_manifest_has_no_catalogs() {
    let (state, _, _) = test_state();
    let (status, body) = get_json(state, "/manifest.json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["behaviorHints"]["configurationRequired"], true);
    assert!(body["catalogs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn configured_manifest_lists_both_catalogs() {
    let (state, _, token) = test_state();
    let (status, body) = get_json(state, &format!("/{token}/manifest.json")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["behaviorHints"]["configurationRequired"], false);

    let catalogs = body["catalogs"].as_array().unwrap();
    assert_eq!(catalogs.len(), 2);
    assert_eq!(catalogs[0]["type"], "movie");
    assert_eq!(catalogs[1]["type"], "series");
}

#[tokio::test]
async fn invalid_token_is_rejected() {
    let (state, _, _) = test_state();

    let (status, _) = get_json(state.clone(), "/not-a-token/manifest.json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get_json(
        state,
        "/not-a-token/catalog/movie/spyglass-movies.json",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_catalogs_are_not_found() {
    let (state, _, token) = test_state();

    let (status, _) = get_json(
        state.clone(),
        &format!("/{token}/catalog/music/spyglass-movies.json"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_json(
        state,
        &format!("/{token}/catalog/movie/other-catalog.json"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_catalog_returns_metas() {
    let (state, _, token) = test_state();
    let (status, body) = get_json(
        state,
        &format!("/{token}/catalog/movie/spyglass-movies/search=the%20matrix.json"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let metas = body["metas"].as_array().unwrap();
    assert_eq!(metas.len(), 1);
    assert_eq!(metas[0]["id"], "tt0133093");
    assert_eq!(metas[0]["type"], "movie");
    assert_eq!(metas[0]["name"], "the matrix");
    assert_eq!(
        metas[0]["poster"],
        "https://image.tmdb.org/t/p/w500/603.jpg"
    );
}

#[tokio::test]
async fn fresh_catalog_responses_come_from_the_cache() {
    let (state, backend, token) = test_state();
    let uri = format!("/{token}/catalog/series/spyglass-series.json");

    // Browse TTL in the testing preset is long enough for back-to-back
    // requests to hit the cache.
    let (status, _) = get_json(state.clone(), &uri).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get_json(state.clone(), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(backend.builds.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn stale_search_responses_are_rebuilt() {
    let (state, backend, token) = test_state();
    let uri = format!("/{token}/catalog/movie/spyglass-movies/search=heat.json");

    let (status, _) = get_json(state.clone(), &uri).await;
    assert_eq!(status, StatusCode::OK);

    // The testing preset keeps search results fresh for 10ms only.
    tokio::time::sleep(std::time::Duration::from_millis(30)).await;

    let (status, _) = get_json(state.clone(), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(backend.builds.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn seal_endpoint_round_trips_into_a_usable_manifest() {
    let (state, _, _) = test_state();

    let settings = serde_json::json!({
        "llm_api_key": "key",
        "tmdb_read_token": "token",
        "rpdb_key": "rpdb"
    });
    let response = router(state.clone())
        .oneshot(
            Request::post("/api/config/seal")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(settings.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let token = body["token"].as_str().unwrap();
    assert_eq!(
        body["manifest_path"],
        format!("/{token}/manifest.json")
    );

    let (status, manifest) = get_json(state, &format!("/{token}/manifest.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(manifest["id"], "com.spyglass.addon");
}

#[tokio::test]
async fn rating_overlay_applies_when_configured() {
    let config = SpyglassConfig::for_testing();
    let backend = Arc::new(CannedBackend::default());
    let state = AppState::new(config.clone(), backend);

    let settings = UserSettings {
        rpdb_key: Some("k0".to_string()),
        ..UserSettings::for_testing()
    };
    let token = SettingsSealer::new(&config.http.seal_secret)
        .seal(&settings)
        .unwrap();

    let (status, body) = get_json(
        state,
        &format!("/{token}/catalog/movie/spyglass-movies/search=heat.json"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["metas"][0]["poster"],
        "https://api.ratingposterdb.com/k0/imdb/poster-default/tt0133093.jpg"
    );
}
