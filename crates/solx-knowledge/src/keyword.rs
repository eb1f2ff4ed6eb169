//! Substring containment matching.

use solx_core::types::{MatchResult, MatchScore};
use tracing::debug;

use crate::matcher::QueryMatcher;
use crate::store::KnowledgeStore;

/// Returns the first entry, in store order, whose topic key appears
/// anywhere in the lowercased query.
///
/// There is no specificity ranking: an earlier short key such as `ram`
/// shadows a later `ram speed` when both occur in the query.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordMatcher;

impl KeywordMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl QueryMatcher for KeywordMatcher {
    fn match_query(&self, query: &str, store: &KnowledgeStore) -> MatchResult {
        match store.lookup_substring(query) {
            Some(entry) => {
                debug!(topic = %entry.topic, "Keyword match");
                MatchResult::matched(entry.clone(), MatchScore::Exact)
            }
            None => {
                debug!("No topic key found in query");
                MatchResult::fallback()
            }
        }
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}
