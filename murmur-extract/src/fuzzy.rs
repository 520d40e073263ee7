//! Approximate string matching behind a narrow, swappable interface.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyHit {
    /// Index into the candidate slice
    pub index: usize,
    /// 0.0 (unrelated) ..= 1.0 (identical)
    pub score: f64,
}

/// Score `query` against every candidate, best first.
///
/// Implementations must be deterministic: equal scores keep candidate order.
pub trait FuzzyMatcher: Send + Sync {
    fn rank(&self, query: &str, candidates: &[&str]) -> Vec<FuzzyHit>;

    fn best(&self, query: &str, candidates: &[&str]) -> Option<FuzzyHit> {
        self.rank(query, candidates).into_iter().next()
    }
}

/// Normalised Levenshtein similarity, case-insensitive.
///
/// A candidate is scored both as a whole ("food & dining") and word by word
/// ("food", "dining"); word hits are scaled by `word_weight` so an exact
/// whole-name match always outranks a partial one.
#[derive(Debug, Clone, Copy)]
pub struct LevenshteinMatcher {
    pub word_weight: f64,
}

impl Default for LevenshteinMatcher {
    fn default() -> Self {
        Self { word_weight: 0.9 }
    }
}

impl LevenshteinMatcher {
    pub fn score(&self, query: &str, candidate: &str) -> f64 {
        let q = query.trim().to_lowercase();
        let c = candidate.trim().to_lowercase();
        if q.is_empty() || c.is_empty() {
            return 0.0;
        }

        let whole = strsim::normalized_levenshtein(&q, &c);
        let by_word = c
            .split(|ch: char| !ch.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(|w| strsim::normalized_levenshtein(&q, w))
            .fold(0.0, f64::max)
            * self.word_weight;

        whole.max(by_word)
    }
}

impl FuzzyMatcher for LevenshteinMatcher {
    fn rank(&self, query: &str, candidates: &[&str]) -> Vec<FuzzyHit> {
        let mut hits: Vec<FuzzyHit> = candidates
            .iter()
            .enumerate()
            .map(|(index, c)| FuzzyHit {
                index,
                score: self.score(query, c),
            })
            .filter(|h| h.score > 0.0)
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(a.index.cmp(&b.index))
        });
        tracing::trace!(query, ?hits, "fuzzy rank");
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_is_one() {
        let m = LevenshteinMatcher::default();
        assert_eq!(m.score("food", "Food"), 1.0);
    }

    #[test]
    fn test_word_match_is_scaled() {
        let m = LevenshteinMatcher::default();
        let s = m.score("food", "Food & Dining");
        assert!((s - 0.9).abs() < 1e-9, "{s}");
    }

    #[test]
    fn test_unrelated_is_low() {
        let m = LevenshteinMatcher::default();
        assert!(m.score("for", "Food") < 0.65);
        assert!(m.score("spent", "Rent") < 0.65);
        assert_eq!(m.score("", "Food"), 0.0);
    }

    #[test]
    fn test_rank_orders_best_first_and_is_stable() {
        let m = LevenshteinMatcher::default();
        let cands = ["Travel", "Transport", "Transport"];
        let hits = m.rank("transport", &cands);
        assert_eq!(hits[0].index, 1);
        assert_eq!(hits[1].index, 2);
        assert_eq!(m.best("transport", &cands).unwrap().score, 1.0);
    }

    #[test]
    fn test_empty_candidates() {
        let m = LevenshteinMatcher::default();
        assert!(m.rank("food", &[]).is_empty());
    }
}
