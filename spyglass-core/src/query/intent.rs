//! Discovery-vs-title and movie-vs-series classification of raw queries.
//!
//! Both judgements are pure functions over the query text, driven by static
//! tables of compiled word-boundary patterns. The tables are ordered: the
//! discovery vocabulary is checked before the year fallback on purpose, so
//! "Best movies of 2023" reads as a discovery request even though it carries
//! a year. The flip side is that a literal title containing a discovery word
//! ("The Best of Me") also reads as discovery; that trade-off is accepted
//! and covered by tests.

use std::sync::LazyLock;

use regex::Regex;

/// What kind of media a query is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaIntent {
    /// The query asks for movies.
    Movie,
    /// The query asks for TV series.
    Series,
    /// The query names no medium, or mixes both.
    Unknown,
}

/// Straight or curly quotation marks; a quoted string names an exact title.
static QUOTE_MARK: LazyLock<Regex> = LazyLock::new(|| Regex::new("[\"\u{201C}\u{201D}\u{2018}\u{2019}]").unwrap());

/// A parenthesized 19xx/20xx year anywhere in the raw query.
static PAREN_CENTURY_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((19|20)\d{2}\)").unwrap());

/// A bare 19xx/20xx year anywhere in the query.
static BARE_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());

/// Vocabulary that marks a query as a discovery request rather than a
/// title lookup.
static DISCOVERY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\btop\b",
        r"\bbest\b",
        r"\bpopular\b",
        r"\btrending\b",
        r"\brecommend(?:ation|ations|ed|ing)?\b",
        r"\bsuggest(?:ion|ions|ed|ing)?\b",
        r"\blist\b",
        r"\branked\b",
        r"\bcollection\b",
        r"\btheme\b",
        r"\b(movies?|films?|shows?|series|tv)\b",
        r"\b(similar to|like)\b",
        r"\b(19[5-9]0|2000)s\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Movie-specific vocabulary.
static MOVIE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\bmovies?\b",
        r"\bfilms?\b",
        r"\bcinema\b",
        r"\bflicks?\b",
        r"\bmotion pictures?\b",
        r"\bfeature films?\b",
        r"\bblockbusters?\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Series-specific vocabulary, excluding the bare "show(s)" pattern which
/// needs context-sensitive handling.
static SERIES_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\btv\s+shows?\b",
        r"\btelevision\s+shows?\b",
        r"\btelevision\b",
        r"\bseries\b",
        r"\btv\s+series\b",
        r"\btelevision\s+series\b",
        r"\bepisodes?\b",
        r"\bseasons?\b",
        r"\bsitcoms?\b",
        r"\bdramas?\s+series\b",
        r"\bminiseries\b",
        r"\bdocumentary\s+series\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Bare "show(s)" counts toward series vocabulary only outside the
/// suppressing contexts below.
static BARE_SHOW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bshows?\b").unwrap());

/// "movie show" / "film show" / "cinema show" is not a TV signal.
static MEDIA_SHOW_CONTEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:movie|film|cinema)\s+shows?\b").unwrap());

/// "show me ..." is an instruction phrase, not a genre signal.
static SHOW_ME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bshow\s+me\b").unwrap());

/// A conjunction joining both vocabularies marks a mixed request.
static CONJUNCTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:and|or)\b").unwrap());

/// Decides whether a query looks like a lookup of one specific title.
///
/// Quoted strings and parenthesized years are immediate yes; any discovery
/// keyword is an immediate no, checked before the bare-year rule so that
/// year-bearing discovery queries stay discovery; a remaining bare year is
/// a yes; otherwise short queries (at most six words) pass as titles.
pub fn is_specific_title_query(search: &str) -> bool {
    if search.trim().is_empty() {
        return false;
    }

    if QUOTE_MARK.is_match(search) {
        return true;
    }

    if PAREN_CENTURY_YEAR.is_match(search) {
        return true;
    }

    let lowered = search.to_lowercase();

    if DISCOVERY_PATTERNS.iter().any(|p| p.is_match(&lowered)) {
        return false;
    }

    if BARE_YEAR.is_match(&lowered) {
        return true;
    }

    lowered.split_whitespace().count() <= 6
}

/// Detects whether a query asks for movies, series, or neither.
///
/// Counts hits against both vocabularies; a conjunction with hits on both
/// sides means the request mixes media and stays [`MediaIntent::Unknown`].
pub fn detect_media_intent(search: &str) -> MediaIntent {
    if search.is_empty() {
        return MediaIntent::Unknown;
    }

    let lowered = search.to_lowercase();

    let movie_matches = MOVIE_PATTERNS.iter().filter(|p| p.is_match(&lowered)).count();

    let mut series_matches = SERIES_PATTERNS
        .iter()
        .filter(|p| p.is_match(&lowered))
        .count();
    if BARE_SHOW.is_match(&lowered)
        && !MEDIA_SHOW_CONTEXT.is_match(&lowered)
        && !SHOW_ME.is_match(&lowered)
    {
        series_matches += 1;
    }

    let mixed = CONJUNCTION.is_match(&lowered) && movie_matches > 0 && series_matches > 0;

    if mixed {
        MediaIntent::Unknown
    } else if movie_matches > 0 && series_matches == 0 {
        MediaIntent::Movie
    } else if series_matches > 0 && movie_matches == 0 {
        MediaIntent::Series
    } else {
        MediaIntent::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_query_is_not_specific() {
        assert!(!is_specific_title_query(""));
        assert!(!is_specific_title_query("   "));
    }

    #[test]
    fn test_quoted_query_is_specific() {
        assert!(is_specific_title_query("\"The Best of Me\""));
        assert!(is_specific_title_query("\u{201C}Heat\u{201D}"));
    }

    #[test]
    fn test_parenthesized_year_is_specific() {
        assert!(is_specific_title_query("Heat (1995)"));
        // Discovery keywords cannot override the parenthesized form, which
        // is checked first.
        assert!(is_specific_title_query("Best (2023)"));
    }

    #[test]
    fn test_discovery_keywords_reject() {
        assert!(!is_specific_title_query("Top horror movies from 1990"));
        assert!(!is_specific_title_query("Best movies of 2023"));
        assert!(!is_specific_title_query("trending sci-fi"));
        assert!(!is_specific_title_query("something similar to Alien"));
        assert!(!is_specific_title_query("great 1980s action"));
    }

    #[test]
    fn test_discovery_keyword_wins_inside_literal_title() {
        // Accepted false negative: a real title containing a discovery word
        // classifies as discovery. Do not "fix" this without revisiting the
        // precedence rules above.
        assert!(!is_specific_title_query("The Best of Me"));
    }

    #[test]
    fn test_bare_year_is_specific() {
        assert!(is_specific_title_query("The Matrix 1999"));
    }

    #[test]
    fn test_short_queries_are_specific() {
        assert!(is_specific_title_query("The Matrix"));
        assert!(is_specific_title_query("Up"));
        assert!(is_specific_title_query("one two three four five six"));
        assert!(!is_specific_title_query(
            "something long that nobody would ever type as a title"
        ));
    }

    #[test]
    fn test_movie_intent() {
        assert_eq!(detect_media_intent("I want a movie"), MediaIntent::Movie);
        assert_eq!(detect_media_intent("classic films"), MediaIntent::Movie);
        assert_eq!(detect_media_intent("a good flick"), MediaIntent::Movie);
    }

    #[test]
    fn test_series_intent() {
        assert_eq!(detect_media_intent("find me a series"), MediaIntent::Series);
        assert_eq!(detect_media_intent("tv shows about space"), MediaIntent::Series);
        assert_eq!(detect_media_intent("a sitcom to binge"), MediaIntent::Series);
        assert_eq!(detect_media_intent("three seasons or less"), MediaIntent::Series);
    }

    #[test]
    fn test_show_me_suppression() {
        assert_eq!(detect_media_intent("show me a movie"), MediaIntent::Movie);
        assert_eq!(detect_media_intent("show me something"), MediaIntent::Unknown);
    }

    #[test]
    fn test_movie_show_suppression() {
        assert_eq!(detect_media_intent("a movie show"), MediaIntent::Movie);
    }

    #[test]
    fn test_bare_show_counts_as_series() {
        assert_eq!(detect_media_intent("a show about chess"), MediaIntent::Series);
    }

    #[test]
    fn test_mixed_request_is_unknown() {
        assert_eq!(detect_media_intent("movies and series"), MediaIntent::Unknown);
        assert_eq!(detect_media_intent("a film or a show"), MediaIntent::Unknown);
    }

    #[test]
    fn test_empty_or_neutral_is_unknown() {
        assert_eq!(detect_media_intent(""), MediaIntent::Unknown);
        assert_eq!(detect_media_intent("something exciting"), MediaIntent::Unknown);
    }
}
