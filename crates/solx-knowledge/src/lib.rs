//! Solx knowledge crate - knowledge store, source parsing, and matchers.
//!
//! Provides the immutable topic/answer store with its built-in default set,
//! the colon and block source formats, a TF-IDF sentence index, and the two
//! matching strategies behind the [`QueryMatcher`] trait.

pub mod error;
pub mod keyword;
pub mod matcher;
pub mod parser;
pub mod similarity;
pub mod store;
pub mod tfidf;

pub use error::KnowledgeError;
pub use keyword::KeywordMatcher;
pub use matcher::QueryMatcher;
pub use parser::parse_source;
pub use similarity::{VectorSimilarityMatcher, DEFAULT_SIMILARITY_THRESHOLD};
pub use store::KnowledgeStore;
pub use tfidf::{cosine_similarity, IndexedSentence, SentenceIndex};
