//! Title/year splitting for free-text titles.

use std::sync::LazyLock;

use regex::Regex;

/// Trailing parenthesized year, e.g. `"The Matrix (1999)"`. Any 4-digit
/// value is accepted here; century filtering belongs to the bare form.
static PAREN_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\((\d{4})\)\s*$").unwrap());

/// Bare trailing year, e.g. `"The Matrix 1999"`. Restricted to 19xx/20xx
/// and requires preceding whitespace so titles like "2001" survive intact.
static TRAILING_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+((19|20)\d{2})\s*$").unwrap());

/// Which trailing-year forms a call site accepts.
///
/// Language-model suggestions are asked for the parenthesized form and
/// nothing else, while raw user queries also get the relaxed bare-year
/// fallback. One function with a mode keeps the two call sites from
/// drifting apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearMode {
    /// Only `"Title (YYYY)"` is recognized.
    ParenthesizedOnly,
    /// `"Title (YYYY)"` first, then a bare trailing `"Title YYYY"`.
    ParenthesizedThenTrailing,
}

/// Splits a trailing year off a free-text title.
///
/// Returns the title with surrounding whitespace removed and the year when
/// one of the accepted trailing forms matched. Inputs without a trailing
/// year come back trimmed and otherwise untouched: a malformed group like
/// `"(19)"` keeps its parentheses, and a leading `"(1972) The Godfather"`
/// is preserved verbatim because only the end of the string is inspected.
pub fn split_title_year(raw: &str, mode: YearMode) -> (String, Option<u16>) {
    if let Some(caps) = PAREN_YEAR.captures(raw) {
        let year = caps[1].parse().ok();
        let title = PAREN_YEAR.replace(raw, "").trim().to_string();
        return (title, year);
    }

    if mode == YearMode::ParenthesizedThenTrailing {
        if let Some(caps) = TRAILING_YEAR.captures(raw) {
            let year = caps[1].parse().ok();
            let title = TRAILING_YEAR.replace(raw, "").trim().to_string();
            return (title, year);
        }
    }

    (raw.trim().to_string(), None)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_parenthesized_year_split() {
        assert_eq!(
            split_title_year("The Matrix (1999)", YearMode::ParenthesizedOnly),
            ("The Matrix".to_string(), Some(1999))
        );
        assert_eq!(
            split_title_year("Inception (2010)", YearMode::ParenthesizedOnly),
            ("Inception".to_string(), Some(2010))
        );
        assert_eq!(
            split_title_year("  Pulp Fiction  (1994)  ", YearMode::ParenthesizedOnly),
            ("Pulp Fiction".to_string(), Some(1994))
        );
    }

    #[test]
    fn test_no_year_returns_trimmed_title() {
        assert_eq!(
            split_title_year("Some Movie", YearMode::ParenthesizedOnly),
            ("Some Movie".to_string(), None)
        );
        assert_eq!(
            split_title_year("  Heat  ", YearMode::ParenthesizedThenTrailing),
            ("Heat".to_string(), None)
        );
    }

    #[test]
    fn test_malformed_year_left_untouched() {
        assert_eq!(
            split_title_year("The Godfather (19)", YearMode::ParenthesizedThenTrailing),
            ("The Godfather (19)".to_string(), None)
        );
    }

    #[test]
    fn test_leading_year_not_stripped() {
        assert_eq!(
            split_title_year("(1972) The Godfather", YearMode::ParenthesizedThenTrailing),
            ("(1972) The Godfather".to_string(), None)
        );
    }

    #[test]
    fn test_bare_trailing_year_only_in_relaxed_mode() {
        assert_eq!(
            split_title_year("The Matrix 1999", YearMode::ParenthesizedThenTrailing),
            ("The Matrix".to_string(), Some(1999))
        );
        assert_eq!(
            split_title_year("The Matrix 1999", YearMode::ParenthesizedOnly),
            ("The Matrix 1999".to_string(), None)
        );
    }

    #[test]
    fn test_bare_year_requires_known_century() {
        assert_eq!(
            split_title_year("Cleopatra 1850", YearMode::ParenthesizedThenTrailing),
            ("Cleopatra 1850".to_string(), None)
        );
    }

    #[test]
    fn test_bare_year_requires_preceding_whitespace() {
        // A title that is nothing but a year has no preceding whitespace
        // and is kept as a title.
        assert_eq!(
            split_title_year("2001", YearMode::ParenthesizedThenTrailing),
            ("2001".to_string(), None)
        );
    }

    #[test]
    fn test_parenthesized_form_wins_over_bare_form() {
        assert_eq!(
            split_title_year("Blade Runner 2049 (2017)", YearMode::ParenthesizedThenTrailing),
            ("Blade Runner 2049".to_string(), Some(2017))
        );
    }

    proptest! {
        /// Re-appending the split year in the same format reproduces the split.
        #[test]
        fn prop_split_is_idempotent(title in "[A-Za-z][A-Za-z ]{0,30}", year in 1900u16..2100) {
            let raw = format!("{} ({})", title.trim(), year);
            let (split_title, split_year) = split_title_year(&raw, YearMode::ParenthesizedOnly);
            prop_assume!(split_year.is_some());
            let rebuilt = format!("{} ({})", split_title, split_year.unwrap());
            prop_assert_eq!(split_title_year(&rebuilt, YearMode::ParenthesizedOnly), (split_title, split_year));
        }

        /// Inputs without any trailing year come back trimmed and unchanged.
        #[test]
        fn prop_yearless_input_is_only_trimmed(title in "[A-Za-z][A-Za-z ]{0,30}[A-Za-z]") {
            let (split_title, split_year) = split_title_year(&title, YearMode::ParenthesizedThenTrailing);
            prop_assert_eq!(split_title, title.trim().to_string());
            prop_assert_eq!(split_year, None);
        }
    }
}
