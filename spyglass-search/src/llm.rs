//! Title suggestions from an OpenAI-compatible chat gateway.
//!
//! The model is asked for plain `Title (Year)` lines; the reply is parsed
//! back through the query core's normalizer, so a hallucinated or oddly
//! formatted line at worst produces a title that TMDB later fails to match.
//! Gateway failures degrade to an empty suggestion list.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use spyglass_core::config::LlmConfig;
use spyglass_core::query::{MediaIntent, YearMode, split_title_year};
use tracing::{debug, warn};
use url::Url;

use crate::errors::SearchError;

/// Leading list decoration the model tends to add despite instructions.
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*\u{2022}]|\d+[.)])\s*").unwrap());

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct SuggestionClient {
    client: reqwest::Client,
    completions_url: Url,
    api_key: String,
    model: String,
}

impl SuggestionClient {
    /// Creates a client for one user's API key, reusing a shared
    /// `reqwest::Client`.
    ///
    /// # Errors
    /// - `SearchError::InvalidBaseUrl` - Configured base URL does not parse
    pub fn new(
        config: &LlmConfig,
        client: reqwest::Client,
        api_key: String,
        model_override: Option<String>,
    ) -> Result<Self, SearchError> {
        // A trailing slash matters to Url::join, so normalize before joining.
        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let completions_url = Url::parse(&base)
            .and_then(|base| base.join("chat/completions"))
            .map_err(|e| SearchError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            completions_url,
            api_key,
            model: model_override.unwrap_or_else(|| config.default_model.clone()),
        })
    }

    /// Asks the model for up to `count` title suggestions for `query`.
    ///
    /// Returns `(title, year)` pairs in model order, deduplicated
    /// case-insensitively. Gateway errors degrade to an empty list.
    pub async fn suggest_titles(
        &self,
        query: &str,
        intent: MediaIntent,
        count: usize,
    ) -> Vec<(String, Option<u16>)> {
        match self.request_completion(query, intent, count).await {
            Ok(reply) => {
                let suggestions = parse_suggestions(&reply, count);
                debug!(
                    "Model produced {} usable suggestions for '{query}'",
                    suggestions.len()
                );
                suggestions
            }
            Err(e) => {
                warn!("Suggestion request degraded to no data: {e}");
                Vec::new()
            }
        }
    }

    async fn request_completion(
        &self,
        query: &str,
        intent: MediaIntent,
        count: usize,
    ) -> Result<String, SearchError> {
        let medium = match intent {
            MediaIntent::Movie => "movies",
            MediaIntent::Series => "TV series",
            MediaIntent::Unknown => "movies or TV series",
        };

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: format!(
                        "You recommend {medium}. Reply with one suggestion per line, \
                         formatted exactly as: Title (Year). No numbering, no commentary."
                    ),
                },
                ChatMessage {
                    role: "user",
                    content: format!("Suggest up to {count} {medium} for: {query}"),
                },
            ],
            temperature: 0.8,
        };

        let response = self
            .client
            .post(self.completions_url.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout {
                        endpoint: "chat/completions".to_string(),
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
                endpoint: "chat/completions".to_string(),
            });
        }
        if !status.is_success() {
            return Err(SearchError::UpstreamStatus {
                status: status.as_u16(),
                endpoint: "chat/completions".to_string(),
            });
        }

        let completion: ChatResponse =
            response.json().await.map_err(|e| SearchError::Parse {
                reason: e.to_string(),
            })?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| SearchError::Suggestion {
                reason: "completion carried no content".to_string(),
            })
    }
}

/// Parses a completion into `(title, year)` pairs.
///
/// One suggestion per line; list markers are stripped, blank lines skipped,
/// and titles deduplicated case-insensitively with the first occurrence
/// winning. Years are recognized only in the parenthesized form the prompt
/// asks for.
fn parse_suggestions(reply: &str, count: usize) -> Vec<(String, Option<u16>)> {
    let mut seen = HashSet::new();
    let mut suggestions = Vec::new();

    for line in reply.lines() {
        let line = LIST_MARKER.replace(line, "");
        let (title, year) = split_title_year(&line, YearMode::ParenthesizedOnly);
        if title.is_empty() {
            continue;
        }
        if !seen.insert(title.to_lowercase()) {
            continue;
        }
        suggestions.push((title, year));
        if suggestions.len() == count {
            break;
        }
    }

    suggestions
}
