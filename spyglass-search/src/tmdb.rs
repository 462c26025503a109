//! TMDB lookups with fuzzy-matched results.
//!
//! Thin client over the TMDB v3 API. Search responses run through the query
//! core's candidate matcher, so callers only ever see the ranked, deduped,
//! capped match set. Every failure mode (timeout, auth, HTTP error, parse
//! error) is logged and degrades to "no data" - a missing provider never
//! takes a catalog request down with it.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use spyglass_core::config::TmdbConfig;
use spyglass_core::query::{Candidate, ScoredMatch, match_candidates};
use tracing::{debug, error, info, warn};

use crate::errors::SearchError;

/// A movie search result from TMDB.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieResult {
    /// TMDB movie id.
    pub id: u64,
    /// Display title; missing on malformed records.
    #[serde(default)]
    pub title: Option<String>,
    /// Release date as `YYYY-MM-DD`.
    #[serde(default)]
    pub release_date: Option<String>,
    /// Plot overview.
    #[serde(default)]
    pub overview: Option<String>,
    /// Poster path fragment, e.g. `/abc.jpg`.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Community rating, 0-10.
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl MovieResult {
    /// Release year parsed from the release date.
    pub fn release_year(&self) -> Option<u16> {
        year_of(self.release_date.as_deref())
    }
}

impl Candidate for MovieResult {
    fn candidate_id(&self) -> u64 {
        self.id
    }

    fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

/// A TV series search result from TMDB.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesResult {
    /// TMDB series id.
    pub id: u64,
    /// Display name; missing on malformed records.
    #[serde(default)]
    pub name: Option<String>,
    /// First air date as `YYYY-MM-DD`.
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Plot overview.
    #[serde(default)]
    pub overview: Option<String>,
    /// Poster path fragment.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Community rating, 0-10.
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl SeriesResult {
    /// First-air year parsed from the air date.
    pub fn release_year(&self) -> Option<u16> {
        year_of(self.first_air_date.as_deref())
    }
}

impl Candidate for SeriesResult {
    fn candidate_id(&self) -> u64 {
        self.id
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// External ids appended to a details response.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalIds {
    /// IMDB id, e.g. `tt0133093`.
    #[serde(default)]
    pub imdb_id: Option<String>,
}

/// Detailed movie record.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetails {
    /// TMDB movie id.
    pub id: u64,
    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
    /// IMDB id when TMDB carries it at the top level.
    #[serde(default)]
    pub imdb_id: Option<String>,
    /// Appended external ids.
    #[serde(default)]
    pub external_ids: Option<ExternalIds>,
}

impl MovieDetails {
    /// IMDB id from whichever field carries it.
    pub fn imdb_ref(&self) -> Option<&str> {
        self.imdb_id
            .as_deref()
            .or_else(|| self.external_ids.as_ref()?.imdb_id.as_deref())
    }
}

/// Detailed series record.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesDetails {
    /// TMDB series id.
    pub id: u64,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Appended external ids.
    #[serde(default)]
    pub external_ids: Option<ExternalIds>,
}

impl SeriesDetails {
    /// IMDB id when the appended external ids carry one.
    pub fn imdb_ref(&self) -> Option<&str> {
        self.external_ids.as_ref()?.imdb_id.as_deref()
    }
}

#[derive(Debug, Deserialize)]
struct SearchPage<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

/// Client for the TMDB v3 API.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    read_token: String,
    language: String,
}

impl TmdbClient {
    /// Creates a client for one user's read token, reusing a shared
    /// `reqwest::Client` (timeouts live on the shared client).
    pub fn new(
        config: &TmdbConfig,
        client: reqwest::Client,
        read_token: String,
        language: String,
    ) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            read_token,
            language,
        }
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, SearchError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.read_token)
            .header("accept", "application/json")
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout {
                        endpoint: endpoint.to_string(),
                    }
                } else {
                    SearchError::Network {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(SearchError::Authentication {
                endpoint: endpoint.to_string(),
            });
        }
        if !status.is_success() {
            return Err(SearchError::UpstreamStatus {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        response.json().await.map_err(|e| SearchError::Parse {
            reason: e.to_string(),
        })
    }

    /// Fetches an endpoint, degrading every failure to `None` with a log line.
    async fn fetch_optional<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Option<T> {
        match self.request_json(endpoint, params).await {
            Ok(value) => Some(value),
            Err(e @ SearchError::Timeout { .. }) => {
                warn!("TMDB request degraded to no data: {e}");
                None
            }
            Err(e) => {
                error!("TMDB request degraded to no data: {e}");
                None
            }
        }
    }

    fn search_params(&self, title: &str) -> Vec<(&'static str, String)> {
        vec![
            ("query", title.to_string()),
            ("include_adult", "false".to_string()),
            ("language", self.language.clone()),
            ("page", "1".to_string()),
        ]
    }

    /// Searches movies by title and optional release year, returning the
    /// ranked match set (at most 5 entries).
    pub async fn search_movies(
        &self,
        title: &str,
        year: Option<u16>,
    ) -> Vec<ScoredMatch<MovieResult>> {
        debug!("Searching TMDB movies for '{title}' (year: {year:?})");

        let mut params = self.search_params(title);
        if let Some(year) = year {
            params.push(("primary_release_year", year.to_string()));
        }

        let Some(page) = self
            .fetch_optional::<SearchPage<MovieResult>>("search/movie", &params)
            .await
        else {
            return Vec::new();
        };

        if page.results.is_empty() {
            warn!("No TMDB movie results for '{title}'");
            return Vec::new();
        }

        let matches = match_candidates(title, page.results);
        if matches.is_empty() {
            info!("No close movie match for '{title}', dropping the suggestion");
        }
        matches
    }

    /// Searches series by title and optional first-air year, returning the
    /// ranked match set (at most 5 entries).
    pub async fn search_series(
        &self,
        title: &str,
        year: Option<u16>,
    ) -> Vec<ScoredMatch<SeriesResult>> {
        debug!("Searching TMDB series for '{title}' (year: {year:?})");

        let mut params = self.search_params(title);
        if let Some(year) = year {
            params.push(("first_air_date_year", year.to_string()));
        }

        let Some(page) = self
            .fetch_optional::<SearchPage<SeriesResult>>("search/tv", &params)
            .await
        else {
            return Vec::new();
        };

        if page.results.is_empty() {
            warn!("No TMDB series results for '{title}'");
            return Vec::new();
        }

        let matches = match_candidates(title, page.results);
        if matches.is_empty() {
            info!("No close series match for '{title}', dropping the suggestion");
        }
        matches
    }

    /// Fetches movie details with external ids appended.
    pub async fn movie_details(&self, id: u64) -> Option<MovieDetails> {
        let params = [
            ("language", self.language.clone()),
            ("append_to_response", "external_ids".to_string()),
        ];
        self.fetch_optional(&format!("movie/{id}"), &params).await
    }

    /// Fetches series details with external ids appended.
    pub async fn series_details(&self, id: u64) -> Option<SeriesDetails> {
        let params = [
            ("language", self.language.clone()),
            ("append_to_response", "external_ids".to_string()),
        ];
        self.fetch_optional(&format!("tv/{id}"), &params).await
    }
}

fn year_of(date: Option<&str>) -> Option<u16> {
    date?.get(..4)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_year_parsing() {
        let movie: MovieResult =
            serde_json::from_str(r#"{"id": 603, "title": "The Matrix", "release_date": "1999-03-30"}"#)
                .unwrap();
        assert_eq!(movie.release_year(), Some(1999));

        let undated: MovieResult =
            serde_json::from_str(r#"{"id": 1, "title": "Undated", "release_date": ""}"#).unwrap();
        assert_eq!(undated.release_year(), None);
    }

    #[test]
    fn test_missing_title_reads_as_empty_name() {
        let movie: MovieResult = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(movie.display_name(), "");

        let series: SeriesResult = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(series.display_name(), "");
    }

    #[test]
    fn test_series_uses_name_field() {
        let series: SeriesResult =
            serde_json::from_str(r#"{"id": 1396, "name": "Breaking Bad", "first_air_date": "2008-01-20"}"#)
                .unwrap();
        assert_eq!(series.display_name(), "Breaking Bad");
        assert_eq!(series.release_year(), Some(2008));
    }

    #[test]
    fn test_imdb_ref_prefers_top_level_then_external() {
        let details: MovieDetails = serde_json::from_str(
            r#"{"id": 603, "title": "The Matrix", "imdb_id": "tt0133093",
                "external_ids": {"imdb_id": "tt9999999"}}"#,
        )
        .unwrap();
        assert_eq!(details.imdb_ref(), Some("tt0133093"));

        let appended_only: MovieDetails = serde_json::from_str(
            r#"{"id": 603, "external_ids": {"imdb_id": "tt0133093"}}"#,
        )
        .unwrap();
        assert_eq!(appended_only.imdb_ref(), Some("tt0133093"));

        let series: SeriesDetails = serde_json::from_str(
            r#"{"id": 1396, "name": "Breaking Bad", "external_ids": {"imdb_id": "tt0903747"}}"#,
        )
        .unwrap();
        assert_eq!(series.imdb_ref(), Some("tt0903747"));
    }

    #[test]
    fn test_search_page_tolerates_missing_results() {
        let page: SearchPage<MovieResult> = serde_json::from_str(r#"{}"#).unwrap();
        assert!(page.results.is_empty());
    }
}
