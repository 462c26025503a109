//! Stremio addon wire types.
//!
//! Only the subset of the addon protocol this companion speaks: manifests
//! with catalog definitions, and catalog responses carrying metas.

use serde::{Deserialize, Serialize};
use spyglass_search::discovery::CatalogEntry;

/// Addon manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Reverse-domain addon id.
    pub id: String,
    /// Addon version.
    pub version: String,
    /// Human-readable addon name.
    pub name: String,
    /// Short description shown in the addon catalog.
    pub description: String,
    /// Resources this addon serves; only `catalog` here.
    pub resources: Vec<String>,
    /// Media types the addon covers.
    pub types: Vec<String>,
    /// Catalogs the addon offers.
    pub catalogs: Vec<CatalogDefinition>,
    /// Meta id prefixes this addon emits.
    #[serde(rename = "idPrefixes")]
    pub id_prefixes: Vec<String>,
    /// Configuration hints for the Stremio UI.
    #[serde(rename = "behaviorHints")]
    pub behavior_hints: BehaviorHints,
}

/// Manifest behavior hints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorHints {
    /// The addon has a configuration page.
    pub configurable: bool,
    /// The addon is unusable until configured.
    #[serde(rename = "configurationRequired")]
    pub configuration_required: bool,
}

/// One catalog offered by the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDefinition {
    /// Media type the catalog serves.
    #[serde(rename = "type")]
    pub media_type: String,
    /// Catalog id used in catalog request paths.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Extra properties the catalog supports.
    #[serde(default)]
    pub extra: Vec<ExtraField>,
}

/// A supported extra property, e.g. search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraField {
    /// Property name.
    pub name: String,
    /// Whether requests must carry the property.
    #[serde(rename = "isRequired")]
    pub is_required: bool,
}

/// A catalog response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetasResponse {
    /// Ranked catalog entries.
    pub metas: Vec<Meta>,
}

/// One catalog entry on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    /// Meta id: the IMDB id when known, `tmdb:<id>` otherwise.
    pub id: String,
    /// Media type of the entry.
    #[serde(rename = "type")]
    pub media_type: String,
    /// Display title.
    pub name: String,
    /// Poster URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    /// Plot overview.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Release year as display text.
    #[serde(rename = "releaseInfo", skip_serializing_if = "Option::is_none")]
    pub release_info: Option<String>,
    /// Community rating as display text.
    #[serde(rename = "imdbRating", skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<String>,
}

impl Meta {
    /// Builds a wire meta from a resolved catalog entry.
    ///
    /// `poster` is chosen by the caller so the rating overlay stays a
    /// separate concern.
    pub fn from_entry(entry: &CatalogEntry, poster: Option<String>) -> Self {
        let id = match &entry.imdb_id {
            Some(imdb_id) => imdb_id.clone(),
            None => format!("tmdb:{}", entry.tmdb_id),
        };

        Self {
            id,
            media_type: entry.kind.as_str().to_string(),
            name: entry.title.clone(),
            poster,
            description: entry.overview.clone(),
            release_info: entry.year.map(|year| year.to_string()),
            imdb_rating: entry.rating.map(|rating| format!("{rating:.1}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use spyglass_search::discovery::CatalogKind;

    use super::*;

    fn entry() -> CatalogEntry {
        CatalogEntry {
            tmdb_id: 603,
            kind: CatalogKind::Movie,
            title: "The Matrix".to_string(),
            year: Some(1999),
            overview: Some("A hacker learns the truth.".to_string()),
            poster_path: Some("/matrix.jpg".to_string()),
            imdb_id: Some("tt0133093".to_string()),
            rating: Some(8.2),
            score: 1.0,
        }
    }

    #[test]
    fn test_meta_prefers_imdb_id() {
        let meta = Meta::from_entry(&entry(), None);
        assert_eq!(meta.id, "tt0133093");
        assert_eq!(meta.media_type, "movie");
        assert_eq!(meta.release_info.as_deref(), Some("1999"));
        assert_eq!(meta.imdb_rating.as_deref(), Some("8.2"));
    }

    #[test]
    fn test_meta_falls_back_to_tmdb_id() {
        let mut source = entry();
        source.imdb_id = None;
        let meta = Meta::from_entry(&source, None);
        assert_eq!(meta.id, "tmdb:603");
    }

    #[test]
    fn test_meta_serialization_skips_empty_fields() {
        let mut source = entry();
        source.overview = None;
        source.rating = None;
        let json = serde_json::to_value(Meta::from_entry(&source, None)).unwrap();

        assert!(json.get("description").is_none());
        assert!(json.get("imdbRating").is_none());
        assert_eq!(json["releaseInfo"], "1999");
        assert_eq!(json["type"], "movie");
    }
}
