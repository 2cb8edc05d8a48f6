//! Block-matching similarity ratio and the long-title containment test.
//!
//! The ratio is the classic "gestalt" measure: find the longest common
//! block, recurse on the pieces to its left and right, and score
//! `2 * matched / (len_a + len_b)`. It is deliberately not an edit distance;
//! swapping in Levenshtein changes which tickets cluster together.

use crate::config::ContainmentPolicy;
use std::collections::HashMap;

/// Second sequences at least this long get the popular-character filter.
const POPULAR_MIN_LEN: usize = 200;

/// Similarity ratio in `[0, 1]` between two normalized strings.
///
/// Either side empty scores 0.0. The arguments are put in a fixed order
/// (shorter first, then lexicographic) before matching, so the score does not
/// depend on which record came first.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (first, second) = if (a_chars.len(), a) <= (b_chars.len(), b) {
        (&a_chars, &b_chars)
    } else {
        (&b_chars, &a_chars)
    };

    let matched = BlockMatcher::new(first, second).matched_chars();
    2.0 * matched as f64 / (first.len() + second.len()) as f64
}

/// Whether one long title literally contains the other, or starts with
/// most of it.
///
/// Only applies when both titles are longer than
/// [`ContainmentPolicy::min_title_chars`].
pub fn is_contained(a: &str, b: &str, policy: &ContainmentPolicy) -> bool {
    if !policy.enabled {
        return false;
    }
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    if a_len <= policy.min_title_chars || b_len <= policy.min_title_chars {
        return false;
    }

    let (shorter, longer, shorter_len) = if a_len < b_len {
        (a, b, a_len)
    } else {
        (b, a, b_len)
    };
    if longer.contains(shorter) {
        return true;
    }

    let prefix_len = (shorter_len as f64 * policy.prefix_ratio) as usize;
    let prefix_end = shorter
        .char_indices()
        .nth(prefix_len)
        .map_or(shorter.len(), |(idx, _)| idx);
    longer.starts_with(&shorter[..prefix_end])
}

struct BlockMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each usable character of `b`, ascending.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> BlockMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }

        // Characters that are everywhere in a long `b` only seed noise matches.
        if b.len() >= POPULAR_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b2j }
    }

    /// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as
    /// `(i, j, size)`; earliest in `a`, then earliest in `b`, wins ties.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        // Grow the block over neighbours the popular filter hid.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }

    /// Total size of all matching blocks.
    fn matched_chars(&self) -> usize {
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];
        let mut total = 0;

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, size) = self.longest_match(alo, ahi, blo, bhi);
            if size == 0 {
                continue;
            }
            total += size;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + size < ahi && j + size < bhi {
                pending.push((i + size, ahi, j + size, bhi));
            }
        }

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    #[test]
    fn identical_strings_score_one() {
        assert!(approx(similarity("fix login bug", "fix login bug"), 1.0));
        assert!(approx(similarity("добавить фильтр", "добавить фильтр"), 1.0));
    }

    #[test]
    fn empty_side_scores_zero() {
        assert!(approx(similarity("", ""), 0.0));
        assert!(approx(similarity("abc", ""), 0.0));
        assert!(approx(similarity("", "abc"), 0.0));
    }

    #[test]
    fn known_ratios() {
        assert!(approx(similarity("abcd", "bcde"), 0.75));
        assert!(approx(similarity("login issue", "export issue"), 14.0 / 23.0));
        assert!(approx(similarity("export to csv", "export to pdf"), 20.0 / 26.0));
        assert!(approx(similarity("crash on startup", "crash at startup"), 0.875));
        assert!(approx(
            similarity(
                "add export button to reports page",
                "add export button to reports page in the new gallery view"
            ),
            66.0 / 90.0
        ));
    }

    #[test]
    fn score_is_symmetric() {
        let pairs = [
            ("totals are zero", "blank pdf"),
            ("sync fails on upload", "upload of photos fails"),
            ("export to csv", "export csv file"),
            ("ab", "ba"),
            ("same length a", "same length b"),
        ];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b).to_bits(), similarity(b, a).to_bits(), "{a:?} vs {b:?}");
        }
        // Asymmetric under naive argument order (1/6 vs 1/4); the shorter string leads.
        assert!(approx(similarity("totals are zero", "blank pdf"), 0.25));
    }

    #[test]
    fn counts_characters_not_bytes() {
        // Cyrillic letters are two bytes each; the ratio is over characters.
        assert!(approx(similarity("тест", "тесь"), 0.75));
    }

    #[test]
    fn popular_characters_do_not_seed_matches() {
        // 'x' fills 200 of 210 chars, so only the digits seed blocks. Without
        // the filter this pair would score about 0.957.
        let a = format!("{}0123456789{}", "x".repeat(100), "x".repeat(100));
        let b = format!("{}9876543210{}", "x".repeat(100), "x".repeat(100));
        assert!(approx(similarity(&a, &b), 202.0 / 420.0));
    }

    #[test]
    fn containment_literal_substring() {
        let policy = ContainmentPolicy::default();
        assert!(is_contained(
            "add export button to reports page",
            "add export button to reports page in the new gallery view",
            &policy
        ));
    }

    #[test]
    fn containment_prefix_rule() {
        let policy = ContainmentPolicy::default();
        // Shorter is 29 chars; its first 23 chars prefix the longer title.
        let shorter = "sync settings between devices";
        let longer = "sync settings between desktop and mobile devices";
        assert!(!longer.contains(shorter));
        assert!(is_contained(shorter, longer, &policy));
        assert!(is_contained(longer, shorter, &policy));
    }

    #[test]
    fn containment_needs_long_titles() {
        let policy = ContainmentPolicy::default();
        // 20 characters exactly is not long enough.
        assert!(!is_contained("export to csv format", "export to csv format in reports", &policy));
        assert!(!is_contained("short", "short but longer than twenty", &policy));
    }

    #[test]
    fn containment_disabled() {
        let policy = ContainmentPolicy {
            enabled: false,
            ..Default::default()
        };
        assert!(!is_contained(
            "add export button to reports page",
            "add export button to reports page in the new gallery view",
            &policy
        ));
    }

    #[test]
    fn unrelated_long_titles_not_contained() {
        let policy = ContainmentPolicy::default();
        assert!(!is_contained(
            "calendar widget shows wrong week",
            "payment gateway rejects valid cards",
            &policy
        ));
    }
}
