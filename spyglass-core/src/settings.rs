//! Per-user companion settings.
//!
//! Everything a single installation needs to talk to its providers. The
//! whole struct travels sealed inside the addon URL (see [`crate::crypto`]),
//! so nothing here is ever persisted server-side.

use serde::{Deserialize, Serialize};

/// Settings supplied by one user at configuration time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    /// API key for the chat-completions gateway.
    pub llm_api_key: String,
    /// Model override; the configured default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_model: Option<String>,
    /// TMDB read access token.
    pub tmdb_read_token: String,
    /// Rating-poster service key; plain TMDB posters are used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpdb_key: Option<String>,
    /// Metadata language, e.g. `en-US`.
    #[serde(default = "default_language")]
    pub language: String,
    /// Upper bound on catalog entries this user wants per response.
    #[serde(default = "default_catalog_size")]
    pub catalog_size: usize,
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_catalog_size() -> usize {
    20
}

impl UserSettings {
    /// Creates settings for tests with only the required credentials set.
    pub fn for_testing() -> Self {
        Self {
            llm_api_key: "test-llm-key".to_string(),
            llm_model: None,
            tmdb_read_token: "test-tmdb-token".to_string(),
            rpdb_key: None,
            language: default_language(),
            catalog_size: default_catalog_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_default() {
        let settings: UserSettings = serde_json::from_str(
            r#"{"llm_api_key": "k", "tmdb_read_token": "t"}"#,
        )
        .unwrap();

        assert_eq!(settings.llm_model, None);
        assert_eq!(settings.rpdb_key, None);
        assert_eq!(settings.language, "en-US");
        assert_eq!(settings.catalog_size, 20);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = UserSettings {
            llm_model: Some("gpt-4o".to_string()),
            rpdb_key: Some("rpdb-key".to_string()),
            ..UserSettings::for_testing()
        };

        let json = serde_json::to_string(&settings).unwrap();
        let parsed: UserSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }
}
