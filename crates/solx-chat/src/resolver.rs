//! Query resolution: validation, matcher dispatch, and fallback wording.

use std::sync::Arc;

use serde::Serialize;
use solx_core::config::{FallbackConfig, SolxConfig};
use solx_core::types::{MatchResult, MatcherMode};
use solx_knowledge::{KeywordMatcher, KnowledgeStore, QueryMatcher, VectorSimilarityMatcher};
use tracing::{debug, info};

use crate::error::ChatError;

// =============================================================================
// FallbackPolicy
// =============================================================================

/// Builds the "not found, search online" answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackPolicy {
    pub prefix: String,
    pub search_endpoint: String,
}

impl FallbackPolicy {
    /// `<prefix><endpoint>?q=<query>` with spaces turned into `+`.
    ///
    /// Only spaces are rewritten; other characters pass through unescaped.
    pub fn format(&self, query: &str) -> String {
        format!(
            "{}{}?q={}",
            self.prefix,
            self.search_endpoint,
            query.to_lowercase().replace(' ', "+")
        )
    }
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        FallbackConfig::default().into()
    }
}

impl From<FallbackConfig> for FallbackPolicy {
    fn from(config: FallbackConfig) -> Self {
        Self {
            prefix: config.prefix,
            search_endpoint: config.search_endpoint,
        }
    }
}

// =============================================================================
// ResponseResolver
// =============================================================================

/// The match behind an answer, for callers that want the score.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub result: MatchResult,
    pub answer: String,
}

/// Pairs a store with one matching strategy and turns queries into answers.
///
/// The strategy is fixed at construction. Resolution is pure: the only
/// state is the shared, read-only store.
pub struct ResponseResolver {
    store: Arc<KnowledgeStore>,
    matcher: Box<dyn QueryMatcher>,
    policy: FallbackPolicy,
}

impl ResponseResolver {
    /// Configure a resolver for `mode`.
    ///
    /// Similarity mode fits the store's sentence index when it has none, so
    /// an empty corpus fails here rather than on the first query.
    pub fn new(
        store: KnowledgeStore,
        mode: MatcherMode,
        threshold: f64,
        policy: FallbackPolicy,
    ) -> Result<Self, ChatError> {
        let store = match mode {
            MatcherMode::Similarity if store.sentence_index().is_none() => {
                store.with_sentence_index()?
            }
            _ => store,
        };
        let matcher: Box<dyn QueryMatcher> = match mode {
            MatcherMode::Keyword => Box::new(KeywordMatcher::new()),
            MatcherMode::Similarity => Box::new(VectorSimilarityMatcher::with_threshold(
                &store, threshold,
            )?),
        };
        info!(matcher = matcher.name(), topics = store.len(), "Response resolver configured");
        Ok(Self::with_matcher(Arc::new(store), matcher, policy))
    }

    /// Configure from the `knowledge` and `fallback` config sections.
    pub fn from_config(store: KnowledgeStore, config: &SolxConfig) -> Result<Self, ChatError> {
        Self::new(
            store,
            config.knowledge.matcher,
            config.knowledge.similarity_threshold,
            config.fallback.clone().into(),
        )
    }

    /// Pair an already shared store with a prebuilt matcher.
    pub fn with_matcher(
        store: Arc<KnowledgeStore>,
        matcher: Box<dyn QueryMatcher>,
        policy: FallbackPolicy,
    ) -> Self {
        Self {
            store,
            matcher,
            policy,
        }
    }

    /// Answer `query` with the matched text or the fallback message.
    ///
    /// # Errors
    /// `ChatError::EmptyQuery` when the query is blank; the matcher is not
    /// consulted.
    pub fn resolve(&self, query: &str) -> Result<String, ChatError> {
        self.resolve_match(query).map(|r| r.answer)
    }

    /// Like [`resolve`](Self::resolve), also returning the match.
    pub fn resolve_match(&self, query: &str) -> Result<Resolution, ChatError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ChatError::EmptyQuery);
        }

        let result = self.matcher.match_query(query, &self.store);
        let answer = match (&result.entry, result.fallback) {
            (Some(entry), false) => entry.text.clone(),
            _ => self.policy.format(query),
        };
        debug!(
            matcher = self.matcher.name(),
            fallback = result.fallback,
            score = ?result.score,
            "Query resolved"
        );
        Ok(Resolution { result, answer })
    }

    pub fn store(&self) -> &Arc<KnowledgeStore> {
        &self.store
    }

    pub fn matcher_name(&self) -> &'static str {
        self.matcher.name()
    }

    pub fn policy(&self) -> &FallbackPolicy {
        &self.policy
    }
}

impl std::fmt::Debug for ResponseResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseResolver")
            .field("matcher", &self.matcher.name())
            .field("topics", &self.store.len())
            .field("policy", &self.policy)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
