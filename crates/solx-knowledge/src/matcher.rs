//! The matching capability shared by every strategy.

use solx_core::types::MatchResult;

use crate::store::KnowledgeStore;

/// Decides which stored answer, if any, a query refers to.
///
/// Implementations are pure: the same `(query, store)` always yields the
/// same result and nothing is mutated. The resolver picks one implementation
/// when it is configured and keeps it for its whole lifetime.
pub trait QueryMatcher: Send + Sync {
    /// Match a trimmed, non-blank query against `store`.
    fn match_query(&self, query: &str, store: &KnowledgeStore) -> MatchResult;

    /// Short strategy name for logs.
    fn name(&self) -> &'static str;
}
