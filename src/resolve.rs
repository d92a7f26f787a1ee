// src/resolve.rs
//! Fuzzy identity resolution for sources without a shared key.
//!
//! Every observed name is scored against every known key with a case-insensitive
//! indel ratio, `2 * LCS / (len_a + len_b)`, on a 0..=100 scale. Spelling variants
//! that only insert or drop characters ("Ben White" / "Benjamin White") score high.
//! The best candidate is accepted only when its score is strictly above the
//! threshold. Ties go to the key that comes first in the resolver's key order.

use crate::config::consts::MATCH_THRESHOLD;

/// One resolution: observed name, the key it resolved to, and the score.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchCandidate {
    pub observed: String,
    pub key: String,
    pub score: u8,
}

/// Case-insensitive similarity on 0..=100.
pub fn similarity(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    score_chars(&a, &b)
}

fn score_chars(a: &[char], b: &[char]) -> u8 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0;
    }
    let ratio = (2 * lcs_len(a, b)) as f64 / total as f64;
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Longest common subsequence length, one rolling row.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diag = 0usize;
        for (j, &cb) in b.iter().enumerate() {
            let up = row[j + 1];
            row[j + 1] = if ca == cb { diag + 1 } else { up.max(row[j]) };
            diag = up;
        }
    }
    row[b.len()]
}

pub struct IdentityResolver {
    keys: Vec<String>,
    lowered: Vec<Vec<char>>,
    threshold: u8,
}

impl IdentityResolver {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_threshold(keys, MATCH_THRESHOLD)
    }

    pub fn with_threshold<I, S>(keys: I, threshold: u8) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        let lowered = keys.iter().map(|k| k.to_lowercase().chars().collect()).collect();
        Self { keys, lowered, threshold }
    }

    /// Highest-scoring key regardless of the threshold. `None` only when there are no keys.
    pub fn best(&self, observed: &str) -> Option<MatchCandidate> {
        let needle: Vec<char> = observed.to_lowercase().chars().collect();
        let mut best: Option<(usize, u8)> = None;
        for (i, k) in self.lowered.iter().enumerate() {
            let score = score_chars(&needle, k);
            // strict `>` keeps the earliest key among equal scores
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((i, score));
            }
        }
        best.map(|(i, score)| MatchCandidate {
            observed: s!(observed),
            key: self.keys[i].clone(),
            score,
        })
    }

    /// Accepted match, or `None` when the best score does not exceed the threshold.
    pub fn resolve(&self, observed: &str) -> Option<MatchCandidate> {
        match self.best(observed) {
            Some(m) if m.score > self.threshold => Some(m),
            Some(m) => {
                logd!("No match for {observed}: best {} at {}", m.key, m.score);
                None
            }
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_strict() {
        // 7 shared of 10 + 10 chars → 70
        assert_eq!(similarity("abcdefghij", "abcdefgxyz"), 70);
        let r = IdentityResolver::new(["abcdefgxyz"]);
        assert!(r.resolve("abcdefghij").is_none());

        // 5 shared of 7 + 7 chars → 71
        assert_eq!(similarity("abcdefg", "abcdexy"), 71);
        let r = IdentityResolver::new(["abcdexy", "zzzzzzz"]);
        let m = r.resolve("abcdefg").unwrap();
        assert_eq!(m.key, "abcdexy");
        assert_eq!(m.score, 71);
    }

    #[test]
    fn inserted_characters_still_match() {
        assert_eq!(similarity("Ben White", "Benjamin White"), 78);
        let r = IdentityResolver::new(["Benjamin White", "Declan Rice"]);
        let m = r.resolve("Ben White").unwrap();
        assert_eq!(m.key, "Benjamin White");
        assert_eq!(m.score, 78);
    }

    #[test]
    fn case_insensitive_and_keeps_canonical_spelling() {
        let r = IdentityResolver::new(["Bukayo Saka", "Martin Odegaard"]);
        let m = r.resolve("BUKAYO SAKA").unwrap();
        assert_eq!(m.key, "Bukayo Saka");
        assert_eq!(m.score, 100);
        assert_eq!(r.resolve("Martin Ødegaard").unwrap().key, "Martin Odegaard");
        assert!(r.resolve("Someone Else Entirely").is_none());
    }

    #[test]
    fn ties_go_to_first_key_and_repeat_stably() {
        let r = IdentityResolver::new(["abcd", "abce"]);
        let first = r.best("abcx").unwrap();
        assert_eq!(first.key, "abcd");
        for _ in 0..3 {
            assert_eq!(r.best("abcx").unwrap(), first);
        }
    }

    #[test]
    fn empty_key_set_resolves_nothing() {
        let r = IdentityResolver::new(Vec::<String>::new());
        assert!(r.best("x").is_none());
        assert!(r.resolve("x").is_none());
    }
}
