//! Addon route handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, Json};
use serde::Serialize;
use serde_json::json;
use spyglass_core::settings::UserSettings;
use spyglass_search::discovery::CatalogKind;
use tracing::{debug, warn};

use crate::server::{AppState, CachedCatalog, CatalogCacheKey};
use crate::stremio::{BehaviorHints, CatalogDefinition, ExtraField, Manifest, Meta, MetasResponse};

/// Catalog id served for movies.
pub const MOVIE_CATALOG_ID: &str = "spyglass-movies";
/// Catalog id served for series.
pub const SERIES_CATALOG_ID: &str = "spyglass-series";

fn base_manifest() -> Manifest {
    Manifest {
        id: "com.spyglass.addon".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        name: "Spyglass".to_string(),
        description: "Natural-language movie and series catalogs, resolved through TMDB"
            .to_string(),
        resources: vec!["catalog".to_string()],
        types: vec!["movie".to_string(), "series".to_string()],
        catalogs: Vec::new(),
        id_prefixes: vec!["tt".to_string(), "tmdb:".to_string()],
        behavior_hints: BehaviorHints {
            configurable: true,
            configuration_required: true,
        },
    }
}

fn catalog_definition(kind: CatalogKind) -> CatalogDefinition {
    let (id, name) = match kind {
        CatalogKind::Movie => (MOVIE_CATALOG_ID, "Spyglass Movies"),
        CatalogKind::Series => (SERIES_CATALOG_ID, "Spyglass Series"),
    };

    CatalogDefinition {
        media_type: kind.as_str().to_string(),
        id: id.to_string(),
        name: name.to_string(),
        extra: vec![ExtraField {
            name: "search".to_string(),
            is_required: false,
        }],
    }
}

/// Liveness probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Minimal configuration page.
pub async fn configure_page() -> Html<&'static str> {
    Html(
        "<!doctype html><html><head><title>Spyglass</title></head><body>\
         <h1>Spyglass</h1>\
         <p>POST your settings as JSON to <code>/api/config/seal</code> to \
         receive a sealed token, then install \
         <code>/&lt;token&gt;/manifest.json</code> in Stremio.</p>\
         </body></html>",
    )
}

/// Manifest for the unconfigured addon: no catalogs, configuration required.
pub async fn get_manifest() -> Json<Manifest> {
    Json(base_manifest())
}

/// Manifest for one configured user.
pub async fn get_user_manifest(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<Manifest>, StatusCode> {
    if state.sealer.unseal(&token).is_err() {
        warn!("Rejected manifest request with invalid settings token");
        return Err(StatusCode::BAD_REQUEST);
    }

    let mut manifest = base_manifest();
    manifest.catalogs = vec![
        catalog_definition(CatalogKind::Movie),
        catalog_definition(CatalogKind::Series),
    ];
    manifest.behavior_hints.configuration_required = false;
    Ok(Json(manifest))
}

#[derive(Debug, Serialize)]
/// Response to a seal request.
pub struct SealResponse {
    /// The sealed settings token.
    pub token: String,
    /// Manifest path ready to install.
    pub manifest_path: String,
}

/// Seals posted settings into an addon token.
pub async fn seal_settings(
    State(state): State<AppState>,
    Json(settings): Json<UserSettings>,
) -> Result<Json<SealResponse>, StatusCode> {
    match state.sealer.seal(&settings) {
        Ok(token) => {
            let manifest_path = format!("/{token}/manifest.json");
            Ok(Json(SealResponse {
                token,
                manifest_path,
            }))
        }
        Err(e) => {
            warn!("Failed to seal settings: {e}");
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

/// Catalog request without extra properties: the browse feed. The final
/// path segment arrives as `<catalog-id>.json`.
pub async fn get_catalog(
    State(state): State<AppState>,
    Path((token, media_type, catalog)): Path<(String, String, String)>,
) -> Result<Json<MetasResponse>, StatusCode> {
    let catalog = strip_json_suffix(&catalog).ok_or(StatusCode::NOT_FOUND)?;
    let kind = validate_catalog(&media_type, catalog)?;
    serve_catalog(state, token, kind, None).await
}

/// Catalog request with extra properties; the final segment arrives as
/// `search=...&skip=....json`.
pub async fn get_catalog_with_extra(
    State(state): State<AppState>,
    Path((token, media_type, catalog, extra)): Path<(String, String, String, String)>,
) -> Result<Json<MetasResponse>, StatusCode> {
    let kind = validate_catalog(&media_type, &catalog)?;
    let extra = strip_json_suffix(&extra).ok_or(StatusCode::NOT_FOUND)?;
    let search = parse_search_extra(extra);
    serve_catalog(state, token, kind, search).await
}

/// Strips the mandatory `.json` suffix from the last path segment.
fn strip_json_suffix(segment: &str) -> Option<&str> {
    segment.strip_suffix(".json")
}

/// Pulls the decoded `search` value out of an extra segment like
/// `search=blade%20runner&skip=0`.
fn parse_search_extra(extra: &str) -> Option<String> {
    extra.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key != "search" || value.is_empty() {
            return None;
        }
        urlencoding::decode(value)
            .ok()
            .map(|decoded| decoded.into_owned())
    })
}

fn validate_catalog(media_type: &str, catalog: &str) -> Result<CatalogKind, StatusCode> {
    let kind = CatalogKind::parse(media_type).ok_or(StatusCode::NOT_FOUND)?;
    let expected = match kind {
        CatalogKind::Movie => MOVIE_CATALOG_ID,
        CatalogKind::Series => SERIES_CATALOG_ID,
    };
    if catalog != expected {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(kind)
}

async fn serve_catalog(
    state: AppState,
    token: String,
    kind: CatalogKind,
    search: Option<String>,
) -> Result<Json<MetasResponse>, StatusCode> {
    let settings = state.sealer.unseal(&token).map_err(|e| {
        warn!("Rejected catalog request with invalid settings token: {e}");
        StatusCode::BAD_REQUEST
    })?;

    let ttl = if search.is_some() {
        state.config.catalog.search_ttl
    } else {
        state.config.catalog.browse_ttl
    };
    let key = CatalogCacheKey {
        token,
        kind,
        search: search.clone(),
    };

    if let Some(cached) = state.catalog_cache.read().await.get(&key) {
        if cached.is_fresh(ttl) {
            debug!("Serving fresh cached catalog for {:?}", key.search);
            return Ok(Json(MetasResponse {
                metas: cached.metas.clone(),
            }));
        }
    }

    let limit = settings.catalog_size.min(state.config.catalog.max_items);
    let entries = state
        .backend
        .build(&settings, kind, search.as_deref(), limit)
        .await;

    let metas: Vec<Meta> = entries
        .iter()
        .map(|entry| {
            let poster = state.poster_overlay.select(
                settings.rpdb_key.as_deref(),
                entry.imdb_id.as_deref(),
                entry.poster_path.as_deref(),
            );
            Meta::from_entry(entry, poster)
        })
        .collect();

    state.catalog_cache.write().await.insert(
        key,
        CachedCatalog {
            metas: metas.clone(),
            created_at: std::time::Instant::now(),
        },
    );

    Ok(Json(MetasResponse { metas }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_suffix() {
        assert_eq!(strip_json_suffix("spyglass-movies.json"), Some("spyglass-movies"));
        assert_eq!(strip_json_suffix("spyglass-movies"), None);
    }

    #[test]
    fn test_parse_search_extra() {
        assert_eq!(
            parse_search_extra("search=blade%20runner"),
            Some("blade runner".to_string())
        );
        assert_eq!(
            parse_search_extra("skip=20&search=heat"),
            Some("heat".to_string())
        );
        assert_eq!(parse_search_extra("skip=20"), None);
        assert_eq!(parse_search_extra("search="), None);
    }

    #[test]
    fn test_validate_catalog() {
        assert_eq!(
            validate_catalog("movie", MOVIE_CATALOG_ID),
            Ok(CatalogKind::Movie)
        );
        assert_eq!(
            validate_catalog("series", SERIES_CATALOG_ID),
            Ok(CatalogKind::Series)
        );
        assert_eq!(
            validate_catalog("movie", SERIES_CATALOG_ID),
            Err(StatusCode::NOT_FOUND)
        );
        assert_eq!(
            validate_catalog("music", MOVIE_CATALOG_ID),
            Err(StatusCode::NOT_FOUND)
        );
    }

    #[test]
    fn test_base_manifest_requires_configuration() {
        let manifest = base_manifest();
        assert!(manifest.catalogs.is_empty());
        assert!(manifest.behavior_hints.configuration_required);
    }
}
