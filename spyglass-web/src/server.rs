//! Addon HTTP server: state, catalog backend, router.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::Router;
use axum::routing::{get, post};
use spyglass_core::config::SpyglassConfig;
use spyglass_core::crypto::SettingsSealer;
use spyglass_core::query::MediaIntent;
use spyglass_core::settings::UserSettings;
use spyglass_search::discovery::{CatalogEntry, CatalogKind, DiscoveryService};
use spyglass_search::llm::SuggestionClient;
use spyglass_search::providers::{MetadataProvider, TitleSuggester};
use spyglass_search::ratings::PosterOverlay;
use spyglass_search::tmdb::TmdbClient;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::handlers::{
    configure_page, get_catalog, get_catalog_with_extra, get_manifest, get_user_manifest, health,
    seal_settings,
};
use crate::stremio::Meta;

/// Produces catalog entries for one unsealed user.
///
/// The trait is the seam between the HTTP layer and the lookup pipeline;
/// tests drive the router with a canned implementation.
#[async_trait]
pub trait CatalogBackend: Send + Sync + std::fmt::Debug {
    /// Builds the entries for one catalog request. `search` is `None` for
    /// the browse feed.
    async fn build(
        &self,
        settings: &UserSettings,
        kind: CatalogKind,
        search: Option<&str>,
        limit: usize,
    ) -> Vec<CatalogEntry>;
}

/// Backend wiring the real TMDB and LLM clients per request.
///
/// Clients are cheap per-request shells over the shared `reqwest::Client`;
/// the user's own credentials come out of the unsealed settings.
#[derive(Debug)]
pub struct LiveBackend {
    config: Arc<SpyglassConfig>,
    client: reqwest::Client,
}

impl LiveBackend {
    /// Creates the live backend over the shared HTTP client.
    pub fn new(config: Arc<SpyglassConfig>, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

/// Suggester used when the configured gateway URL is unusable; discovery
/// queries then resolve to nothing while title lookups keep working.
#[derive(Debug)]
struct NoSuggestions;

#[async_trait]
impl TitleSuggester for NoSuggestions {
    async fn suggest(
        &self,
        _query: &str,
        _intent: MediaIntent,
        _count: usize,
    ) -> Vec<(String, Option<u16>)> {
        Vec::new()
    }
}

#[async_trait]
impl CatalogBackend for LiveBackend {
    async fn build(
        &self,
        settings: &UserSettings,
        kind: CatalogKind,
        search: Option<&str>,
        limit: usize,
    ) -> Vec<CatalogEntry> {
        let provider: Arc<dyn MetadataProvider> = Arc::new(TmdbClient::new(
            &self.config.tmdb,
            self.client.clone(),
            settings.tmdb_read_token.clone(),
            settings.language.clone(),
        ));

        let suggester: Arc<dyn TitleSuggester> = match SuggestionClient::new(
            &self.config.llm,
            self.client.clone(),
            settings.llm_api_key.clone(),
            settings.llm_model.clone(),
        ) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                error!("Suggestion client unavailable: {e}");
                Arc::new(NoSuggestions)
            }
        };

        let discovery =
            DiscoveryService::new(provider, suggester, self.config.llm.suggestion_count);

        match search {
            Some(query) => discovery.resolve(query, kind, limit).await,
            None => discovery.default_feed(kind, limit).await,
        }
    }
}

/// Key for one remembered catalog response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogCacheKey {
    /// Sealed settings token the response was built for.
    pub token: String,
    /// Catalog kind.
    pub kind: CatalogKind,
    /// Search query, `None` for the browse feed.
    pub search: Option<String>,
}

/// One remembered catalog response.
#[derive(Debug, Clone)]
pub struct CachedCatalog {
    /// Wire-ready metas.
    pub metas: Vec<Meta>,
    /// When the response was built.
    pub created_at: Instant,
}

impl CachedCatalog {
    /// Whether the entry is still fresh under `ttl`.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() < ttl
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<SpyglassConfig>,
    /// Settings token sealer.
    pub sealer: Arc<SettingsSealer>,
    /// Catalog entry source.
    pub backend: Arc<dyn CatalogBackend>,
    /// Poster selection for catalog metas.
    pub poster_overlay: Arc<PosterOverlay>,
    /// TTL-checked catalog responses.
    pub catalog_cache: Arc<RwLock<HashMap<CatalogCacheKey, CachedCatalog>>>,
}

impl AppState {
    /// Creates state over an explicit backend; tests pass a canned one.
    pub fn new(config: SpyglassConfig, backend: Arc<dyn CatalogBackend>) -> Self {
        let sealer = Arc::new(SettingsSealer::new(&config.http.seal_secret));
        let poster_overlay = Arc::new(PosterOverlay::new(&config.tmdb, &config.ratings));
        Self {
            config: Arc::new(config),
            sealer,
            backend,
            poster_overlay,
            catalog_cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

/// Builds the addon router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(configure_page))
        .route("/configure", get(configure_page))
        .route("/health", get(health))
        .route("/manifest.json", get(get_manifest))
        .route("/api/config/seal", post(seal_settings))
        .route("/{token}/manifest.json", get(get_user_manifest))
        .route("/{token}/catalog/{media_type}/{catalog}", get(get_catalog))
        .route(
            "/{token}/catalog/{media_type}/{catalog}/{extra}",
            get(get_catalog_with_extra),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Runs the addon server until shutdown.
///
/// # Errors
///
/// Returns an error when the listener cannot bind or the server loop fails.
pub async fn run_server(config: SpyglassConfig) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::builder()
        .timeout(config.http.request_timeout)
        .user_agent(config.http.user_agent)
        .build()?;

    let bind = format!("{}:{}", config.http.bind_address, config.http.port);
    let state = AppState::new(config.clone(), Arc::new(LiveBackend::new(Arc::new(config), client)));
    let app = router(state);

    info!("Spyglass addon server running on http://{bind}");
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
