//! Sequence similarity ratio used by the fuzzy matcher.

use std::collections::HashMap;

/// Similarity ratio between two strings based on longest matching blocks.
///
/// Recursively finds the longest common contiguous block, then repeats on
/// the pieces to the left and right of it; the ratio is `2 * M / T` where
/// `M` is the total length of all matching blocks and `T` the combined
/// length of both inputs. Compared per `char`, so the caller decides about
/// case folding.
///
/// Contract: symmetric, always within `0.0..=1.0`, exactly `1.0` iff the
/// inputs are equal (two empty strings count as equal).
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * total_match_size(&a, &b) as f64 / total as f64
}

/// Sum of the lengths of all matching blocks between `a` and `b`.
fn total_match_size(a: &[char], b: &[char]) -> usize {
    // Positions of every char of b, for O(1) candidate lookups.
    let mut b_positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, ch) in b.iter().enumerate() {
        b_positions.entry(*ch).or_default().push(j);
    }

    let mut total = 0;
    let mut regions = vec![(0, a.len(), 0, b.len())];
    while let Some((a_lo, a_hi, b_lo, b_hi)) = regions.pop() {
        let (i, j, size) = longest_match(a, &b_positions, a_lo, a_hi, b_lo, b_hi);
        if size > 0 {
            total += size;
            regions.push((a_lo, i, b_lo, j));
            regions.push((i + size, a_hi, j + size, b_hi));
        }
    }
    total
}

/// Longest contiguous match between `a[a_lo..a_hi]` and `b[b_lo..b_hi]`.
///
/// Returns `(start_in_a, start_in_b, length)`; on equally long matches the
/// earliest one wins, which keeps the recursion deterministic.
fn longest_match(
    a: &[char],
    b_positions: &HashMap<char, Vec<usize>>,
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let mut best = (a_lo, b_lo, 0);

    // For each prefix of a, run_lengths[j] is the length of the match
    // ending at a[i], b[j].
    let mut run_lengths: HashMap<usize, usize> = HashMap::new();
    for i in a_lo..a_hi {
        let mut next_runs = HashMap::new();
        if let Some(positions) = b_positions.get(&a[i]) {
            for &j in positions {
                if j < b_lo {
                    continue;
                }
                if j >= b_hi {
                    break;
                }
                let length = if j > b_lo {
                    run_lengths.get(&(j - 1)).copied().unwrap_or(0) + 1
                } else {
                    1
                };
                next_runs.insert(j, length);
                if length > best.2 {
                    best = (i + 1 - length, j + 1 - length, length);
                }
            }
        }
        run_lengths = next_runs;
    }

    best
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_equal_strings_score_one() {
        assert_eq!(sequence_ratio("the matrix", "the matrix"), 1.0);
        assert_eq!(sequence_ratio("", ""), 1.0);
    }

    #[test]
    fn test_disjoint_strings_score_zero() {
        assert_eq!(sequence_ratio("abc", "xyz"), 0.0);
        assert_eq!(sequence_ratio("", "abc"), 0.0);
    }

    #[test]
    fn test_known_ratios() {
        // One matching block "bcd" of length 3, T = 9.
        assert!((sequence_ratio("abcd", "bcdab") - 6.0 / 9.0).abs() < 1e-9);
        // Blocks "the " + "atrix" = 9 of T = 20.
        assert!((sequence_ratio("the matrix", "the 2atrix") - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_typos_score_high() {
        assert!(sequence_ratio("the matrix", "the matrx") > 0.9);
        assert!(sequence_ratio("interstellar", "intersteller") > 0.9);
    }

    #[test]
    fn test_unrelated_titles_score_low() {
        assert!(sequence_ratio("the matrix", "finding nemo") < 0.4);
    }

    #[test]
    fn test_subtitle_difference_lands_midrange() {
        let score = sequence_ratio("dune", "dune: part two");
        assert!(score > 0.4 && score < 0.65, "unexpected score {score}");
    }

    proptest! {
        #[test]
        fn prop_bounds(a in ".{0,24}", b in ".{0,24}") {
            let score = sequence_ratio(&a, &b);
            prop_assert!((0.0..=1.0).contains(&score));
        }

        #[test]
        fn prop_equal_iff_one(a in ".{0,24}") {
            prop_assert_eq!(sequence_ratio(&a, &a), 1.0);
        }

    }

    #[test]
    fn test_symmetric_on_title_pairs() {
        let pairs = [
            ("the matrix", "the matrx"),
            ("dune", "dune: part two"),
            ("interstellar", "intersteller"),
            ("heat", "heat"),
            ("abc", "xyz"),
        ];
        for (a, b) in pairs {
            assert!(
                (sequence_ratio(a, b) - sequence_ratio(b, a)).abs() < 1e-9,
                "asymmetric for ({a}, {b})"
            );
        }
    }
}
