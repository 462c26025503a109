//! Poster selection with the optional rating overlay.

use spyglass_core::config::{RatingsConfig, TmdbConfig};

/// Chooses catalog artwork: rating-overlay posters when the user has a key
/// and the title has an IMDB id, plain TMDB posters otherwise.
#[derive(Debug, Clone)]
pub struct PosterOverlay {
    image_base_url: String,
    ratings_base_url: String,
    tier: String,
}

impl PosterOverlay {
    /// Builds the overlay from the TMDB and ratings configuration.
    pub fn new(tmdb: &TmdbConfig, ratings: &RatingsConfig) -> Self {
        Self {
            image_base_url: tmdb.image_base_url.clone(),
            ratings_base_url: ratings.base_url.clone(),
            tier: ratings.tier.clone(),
        }
    }

    /// Selects the poster URL for one catalog entry.
    ///
    /// The rating-poster service is keyed by IMDB id, so the overlay applies
    /// only when both the user key and the id are present; otherwise the
    /// TMDB poster path is used, and `None` means no artwork at all.
    pub fn select(
        &self,
        rpdb_key: Option<&str>,
        imdb_id: Option<&str>,
        poster_path: Option<&str>,
    ) -> Option<String> {
        if let (Some(key), Some(imdb_id)) = (rpdb_key, imdb_id) {
            return Some(format!(
                "{}/{}/imdb/{}/{}.jpg",
                self.ratings_base_url, key, self.tier, imdb_id
            ));
        }

        poster_path.map(|path| format!("{}{}", self.image_base_url, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay() -> PosterOverlay {
        PosterOverlay::new(&TmdbConfig::default(), &RatingsConfig::default())
    }

    #[test]
    fn test_overlay_applies_with_key_and_imdb_id() {
        let poster = overlay().select(Some("k0"), Some("tt0133093"), Some("/matrix.jpg"));
        assert_eq!(
            poster.as_deref(),
            Some("https://api.ratingposterdb.com/k0/imdb/poster-default/tt0133093.jpg")
        );
    }

    #[test]
    fn test_falls_back_to_tmdb_poster_without_key() {
        let poster = overlay().select(None, Some("tt0133093"), Some("/matrix.jpg"));
        assert_eq!(
            poster.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/matrix.jpg")
        );
    }

    #[test]
    fn test_falls_back_to_tmdb_poster_without_imdb_id() {
        let poster = overlay().select(Some("k0"), None, Some("/matrix.jpg"));
        assert_eq!(
            poster.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/matrix.jpg")
        );
    }

    #[test]
    fn test_no_artwork_at_all() {
        assert_eq!(overlay().select(None, None, None), None);
    }
}
