//! Fuzzy matching of a query title against provider search results.

use std::collections::HashSet;

use crate::query::similarity::sequence_ratio;

/// Minimum similarity for a confident fuzzy match.
const FUZZY_MATCH_THRESHOLD: f64 = 0.85;
/// Relaxed similarity still worth keeping.
const RELAXED_MATCH_THRESHOLD: f64 = 0.65;
/// Floor below which even the provider's first result is rejected.
const TOP_RESULT_THRESHOLD: f64 = 0.40;
/// Upper bound on matches returned per lookup.
pub const MAX_MATCHES: usize = 5;

/// A provider search result the matcher can score.
///
/// Which field holds the display name differs by media type (movies carry a
/// `title`, series a `name`); implementations bridge that difference. A
/// record missing its name reports an empty string, which scores low and
/// filters out naturally.
pub trait Candidate {
    /// Provider-unique identifier, used for deduplication.
    fn candidate_id(&self) -> u64;
    /// Display name to score against the query title.
    fn display_name(&self) -> &str;
}

/// A candidate annotated with its match score.
#[derive(Debug, Clone)]
pub struct ScoredMatch<T> {
    /// The surviving candidate.
    pub candidate: T,
    /// Similarity to the query title, `1.0` for an exact match.
    pub score: f64,
}

/// Scores and filters provider results against a query title.
///
/// Case-insensitive exact matches always survive with score 1.0. Everything
/// else is scored with [`sequence_ratio`] and kept when it clears the
/// confident or relaxed threshold; the provider's first result gets a lower
/// floor, rescuing a plausible best guess whose literal similarity suffers
/// from subtitle differences. Survivors are deduplicated by id (first
/// occurrence wins), ranked by score descending (stable, so provider order
/// breaks ties), and capped at [`MAX_MATCHES`]. An empty result means no
/// confident match exists; callers treat hallucinated titles that way.
pub fn match_candidates<T: Candidate>(query_title: &str, candidates: Vec<T>) -> Vec<ScoredMatch<T>> {
    let query_lower = query_title.to_lowercase();

    let mut matches = Vec::new();
    for (index, candidate) in candidates.into_iter().enumerate() {
        let name_lower = candidate.display_name().to_lowercase();

        if name_lower == query_lower {
            matches.push(ScoredMatch {
                candidate,
                score: 1.0,
            });
            continue;
        }

        let score = sequence_ratio(&query_lower, &name_lower);
        if score >= FUZZY_MATCH_THRESHOLD
            || score >= RELAXED_MATCH_THRESHOLD
            || (index == 0 && score >= TOP_RESULT_THRESHOLD)
        {
            matches.push(ScoredMatch { candidate, score });
        }
    }

    let mut seen_ids = HashSet::new();
    matches.retain(|entry| seen_ids.insert(entry.candidate.candidate_id()));

    matches.sort_by(|left, right| {
        right
            .score
            .partial_cmp(&left.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    matches.truncate(MAX_MATCHES);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct FakeResult {
        id: u64,
        name: &'static str,
    }

    impl Candidate for FakeResult {
        fn candidate_id(&self) -> u64 {
            self.id
        }

        fn display_name(&self) -> &str {
            self.name
        }
    }

    fn result(id: u64, name: &'static str) -> FakeResult {
        FakeResult { id, name }
    }

    #[test]
    fn test_exact_match_ranks_first_regardless_of_order() {
        let candidates = vec![
            result(1, "The Matrix Reloaded"),
            result(2, "The Matrix Revolutions"),
            result(3, "the matrix"),
        ];

        let matches = match_candidates("The Matrix", candidates);
        assert_eq!(matches[0].candidate.id, 3);
        assert_eq!(matches[0].score, 1.0);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let matches = match_candidates("The Matrix", Vec::<FakeResult>::new());
        assert!(matches.is_empty());
    }

    #[test]
    fn test_all_below_thresholds_yields_empty_output() {
        let candidates = vec![
            result(1, "Completely Unrelated Documentary"),
            result(2, "Another Nonmatching Entry"),
        ];

        let matches = match_candidates("Up", candidates);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_first_result_rescued_by_lower_floor() {
        // Scores in the 0.40..0.65 band survive only in first position.
        let candidates = vec![result(1, "Dune: Part Two"), result(2, "Dune: Part Two")];

        let matches = match_candidates("Dune", candidates);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].candidate.id, 1);
        assert!(matches[0].score >= 0.40 && matches[0].score < 0.65);
    }

    #[test]
    fn test_result_capped_at_five() {
        let candidates = vec![
            result(1, "Halloween"),
            result(2, "Halloween"),
            result(3, "Halloween"),
            result(4, "Halloween"),
            result(5, "Halloween"),
            result(6, "Halloween"),
            result(7, "Halloween"),
        ];

        let matches = match_candidates("Halloween", candidates);
        assert_eq!(matches.len(), MAX_MATCHES);
    }

    #[test]
    fn test_duplicate_ids_deduplicated_first_wins() {
        let candidates = vec![
            result(9, "Alien"),
            result(9, "Alien"),
            result(4, "Aliens"),
        ];

        let matches = match_candidates("Alien", candidates);
        let ids: Vec<u64> = matches.iter().map(|m| m.candidate.id).collect();
        assert_eq!(ids.iter().filter(|&&id| id == 9).count(), 1);
    }

    #[test]
    fn test_missing_name_scores_low_and_drops_out() {
        let candidates = vec![result(1, "Alien"), result(2, "")];

        let matches = match_candidates("Alien", candidates);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].candidate.id, 1);
    }

    #[test]
    fn test_stable_order_for_tied_scores() {
        let candidates = vec![result(1, "Halloween"), result(2, "Halloween")];

        let matches = match_candidates("Halloween", candidates);
        let ids: Vec<u64> = matches.iter().map(|m| m.candidate.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_close_titles_kept_and_ranked_by_score() {
        let candidates = vec![
            result(1, "The Matrix Reloaded"),
            result(2, "The Matrix"),
        ];

        let matches = match_candidates("The Matrix", candidates);
        assert_eq!(matches[0].candidate.id, 2);
        assert!(matches[0].score > matches[1].score);
    }
}
