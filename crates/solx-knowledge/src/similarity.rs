//! Cosine-similarity matching over the store's TF-IDF sentence index.

use solx_core::types::{KnowledgeEntry, MatchResult, MatchScore};
use tracing::{debug, warn};

use crate::error::KnowledgeError;
use crate::matcher::QueryMatcher;
use crate::store::KnowledgeStore;

/// Best scores below this are treated as "not found".
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.3;

/// Ranks every indexed sentence by cosine similarity to the query and
/// answers with the best one when it clears the threshold.
#[derive(Debug, Clone, Copy)]
pub struct VectorSimilarityMatcher {
    threshold: f64,
}

impl VectorSimilarityMatcher {
    /// Pair a matcher with `store`, which must already carry a sentence
    /// index (see [`KnowledgeStore::with_sentence_index`]).
    pub fn new(store: &KnowledgeStore) -> Result<Self, KnowledgeError> {
        Self::with_threshold(store, DEFAULT_SIMILARITY_THRESHOLD)
    }

    /// Like [`new`](Self::new) with a custom threshold in `[0, 1]`.
    pub fn with_threshold(store: &KnowledgeStore, threshold: f64) -> Result<Self, KnowledgeError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(KnowledgeError::Configuration(format!(
                "similarity threshold must be within [0, 1], got {}",
                threshold
            )));
        }
        match store.sentence_index() {
            Some(index) if !index.is_empty() => Ok(Self { threshold }),
            _ => Err(KnowledgeError::Configuration(
                "similarity matcher requires a store with a fitted sentence index".to_string(),
            )),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl QueryMatcher for VectorSimilarityMatcher {
    fn match_query(&self, query: &str, store: &KnowledgeStore) -> MatchResult {
        let query = query.to_lowercase();
        if query.trim().is_empty() {
            return MatchResult::fallback();
        }

        let Some(index) = store.sentence_index() else {
            warn!("Similarity match requested on a store without a sentence index");
            return MatchResult::fallback();
        };

        let Some((best, score)) = index.best_match(&query) else {
            return MatchResult::fallback();
        };

        if score < self.threshold {
            debug!(score, threshold = self.threshold, "Best sentence below threshold");
            return MatchResult::below_threshold(score);
        }

        match index.sentence(best) {
            Some(sentence) => {
                debug!(topic = %sentence.topic, score, "Similarity match");
                MatchResult::matched(
                    KnowledgeEntry {
                        topic: sentence.topic.clone(),
                        text: sentence.text.clone(),
                    },
                    MatchScore::Similarity(score),
                )
            }
            None => MatchResult::fallback(),
        }
    }

    fn name(&self) -> &'static str {
        "similarity"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indexed_builtin() -> KnowledgeStore {
        KnowledgeStore::builtin().with_sentence_index().unwrap()
    }

    fn similarity(result: &MatchResult) -> f64 {
        match result.score {
            MatchScore::Similarity(s) => s,
            other => panic!("expected similarity score, got {:?}", other),
        }
    }

    #[test]
    fn test_new_requires_index() {
        let err = VectorSimilarityMatcher::new(&KnowledgeStore::builtin()).unwrap_err();
        assert!(matches!(err, KnowledgeError::Configuration(_)));
    }

    #[test]
    fn test_threshold_out_of_range() {
        let store = indexed_builtin();
        assert!(VectorSimilarityMatcher::with_threshold(&store, 1.2).is_err());
        assert!(VectorSimilarityMatcher::with_threshold(&store, -0.1).is_err());
        let m = VectorSimilarityMatcher::with_threshold(&store, 0.5).unwrap();
        assert!((m.threshold() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_identical_sentence_scores_one() {
        let store = indexed_builtin();
        let matcher = VectorSimilarityMatcher::new(&store).unwrap();
        let result = matcher.match_query("RAM stores temporary data for fast access.", &store);
        assert!(!result.fallback);
        assert!((similarity(&result) - 1.0).abs() < 1e-6);
        let entry = result.entry.unwrap();
        assert_eq!(entry.topic, "ram");
        assert_eq!(entry.text, "RAM stores temporary data for fast access.");
    }

    #[test]
    fn test_related_query_matches_sentence() {
        let store = indexed_builtin();
        let matcher = VectorSimilarityMatcher::new(&store).unwrap();
        let result = matcher.match_query("which programming language is popular", &store);
        assert!(!result.fallback);
        assert_eq!(result.entry.unwrap().topic, "python");
    }

    #[test]
    fn test_scores_within_unit_interval() {
        let store = indexed_builtin();
        let matcher = VectorSimilarityMatcher::with_threshold(&store, 0.0).unwrap();
        for query in [
            "cpu",
            "the the the",
            "memory files hardware programs",
            "zzqqxx",
            "Python is a popular programming language for many tasks.",
        ] {
            let s = similarity(&matcher.match_query(query, &store));
            assert!((0.0..=1.0).contains(&s), "score {} out of range for {}", s, query);
        }
    }

    #[test]
    fn test_below_threshold_is_fallback() {
        let store = indexed_builtin();
        let matcher = VectorSimilarityMatcher::new(&store).unwrap();
        let result = matcher.match_query("zzqqxx", &store);
        assert!(result.fallback);
        assert!(result.entry.is_none());
        assert!(similarity(&result) < DEFAULT_SIMILARITY_THRESHOLD);
    }

    #[test]
    fn test_threshold_applies_regardless_of_argmax() {
        let store = indexed_builtin();
        // A bar of 1.0 rejects anything short of an identical sentence.
        let strict = VectorSimilarityMatcher::with_threshold(&store, 1.0).unwrap();
        let result = strict.match_query("the cpu", &store);
        assert!(result.fallback);
        assert!(result.entry.is_none());
    }

    #[test]
    fn test_blank_query_skips_vector_math() {
        let store = indexed_builtin();
        let matcher = VectorSimilarityMatcher::new(&store).unwrap();
        let result = matcher.match_query("   ", &store);
        assert!(result.fallback);
        assert_eq!(result.score, MatchScore::None);
    }

    #[test]
    fn test_store_without_index_falls_back() {
        let indexed = indexed_builtin();
        let matcher = VectorSimilarityMatcher::new(&indexed).unwrap();
        let result = matcher.match_query("cpu", &KnowledgeStore::builtin());
        assert!(result.fallback);
    }
}
