//! Centralized configuration for Spyglass.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::time::Duration;

/// Central configuration for all Spyglass components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct SpyglassConfig {
    pub http: HttpConfig,
    pub llm: LlmConfig,
    pub tmdb: TmdbConfig,
    pub ratings: RatingsConfig,
    pub catalog: CatalogConfig,
}

/// Web server and shared HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Address the addon server binds to
    pub bind_address: String,
    /// Port the addon server listens on
    pub port: u16,
    /// Timeout applied to every outbound request
    pub request_timeout: Duration,
    /// User agent for outbound requests
    pub user_agent: &'static str,
    /// Secret the settings sealer derives its key from
    pub seal_secret: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 7777,
            request_timeout: Duration::from_secs(10),
            user_agent: "spyglass/0.1.0",
            seal_secret: "spyglass-insecure-dev-secret".to_string(),
        }
    }
}

/// Language-model gateway configuration.
///
/// Targets any OpenAI-compatible chat-completions endpoint; the per-user
/// API key travels in [`crate::settings::UserSettings`], not here.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL of the chat-completions gateway
    pub base_url: String,
    /// Model used when the user settings name none
    pub default_model: String,
    /// Number of title suggestions requested per query
    pub suggestion_count: usize,
    /// Timeout for a single completion request
    pub request_timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            default_model: "gpt-4o-mini".to_string(),
            suggestion_count: 20,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// TMDB API configuration.
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    /// Base URL of the TMDB v3 API
    pub base_url: String,
    /// Base URL for poster images, including the size segment
    pub image_base_url: String,
    /// Language used when the user settings name none
    pub default_language: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            default_language: "en-US".to_string(),
        }
    }
}

/// Rating-poster overlay configuration.
#[derive(Debug, Clone)]
pub struct RatingsConfig {
    /// Base URL of the rating-poster service
    pub base_url: String,
    /// Poster style tier requested from the service
    pub tier: String,
}

impl Default for RatingsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.ratingposterdb.com".to_string(),
            tier: "poster-default".to_string(),
        }
    }
}

/// Catalog generation and freshness configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// How long a browse (no search) catalog stays fresh
    pub browse_ttl: Duration,
    /// How long a search-driven catalog stays fresh
    pub search_ttl: Duration,
    /// Upper bound on catalog entries per response
    pub max_items: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            browse_ttl: Duration::from_secs(3600),
            search_ttl: Duration::from_secs(300),
            max_items: 20,
        }
    }
}

impl SpyglassConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(bind) = std::env::var("SPYGLASS_BIND") {
            config.http.bind_address = bind;
        }

        if let Ok(port) = std::env::var("SPYGLASS_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                config.http.port = port;
            }
        }

        if let Ok(secret) = std::env::var("SPYGLASS_SECRET") {
            config.http.seal_secret = secret;
        }

        if let Ok(timeout) = std::env::var("SPYGLASS_REQUEST_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.http.request_timeout = Duration::from_secs(seconds);
            }
        }

        if let Ok(base_url) = std::env::var("SPYGLASS_LLM_BASE_URL") {
            config.llm.base_url = base_url;
        }

        if let Ok(model) = std::env::var("SPYGLASS_LLM_MODEL") {
            config.llm.default_model = model;
        }

        if let Ok(count) = std::env::var("SPYGLASS_SUGGESTION_COUNT") {
            if let Ok(count) = count.parse::<usize>() {
                config.llm.suggestion_count = count;
            }
        }

        if let Ok(ttl) = std::env::var("SPYGLASS_BROWSE_TTL") {
            if let Ok(seconds) = ttl.parse::<u64>() {
                config.catalog.browse_ttl = Duration::from_secs(seconds);
            }
        }

        if let Ok(ttl) = std::env::var("SPYGLASS_SEARCH_TTL") {
            if let Ok(seconds) = ttl.parse::<u64>() {
                config.catalog.search_ttl = Duration::from_secs(seconds);
            }
        }

        config
    }

    /// Creates a configuration optimized for testing.
    ///
    /// Uses short TTLs and a fixed sealing secret so tests are fast
    /// and reproducible.
    pub fn for_testing() -> Self {
        let mut config = Self::default();
        config.http.seal_secret = "spyglass-test-secret".to_string();
        config.catalog.browse_ttl = Duration::from_millis(50);
        config.catalog.search_ttl = Duration::from_millis(10);
        config.catalog.max_items = 5;
        config
    }
}
