//! Error types for knowledge loading and matcher construction.

use std::path::PathBuf;

use solx_core::error::SolxError;

/// Errors from the knowledge store and matchers.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    /// The source exists but could not be read or contained no entries.
    /// Callers recover by substituting the built-in store.
    #[error("failed to load knowledge from {path}: {reason}")]
    Load { path: PathBuf, reason: String },
    /// A matcher was paired with a store it cannot work over.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<KnowledgeError> for SolxError {
    fn from(err: KnowledgeError) -> Self {
        match err {
            KnowledgeError::Configuration(msg) => SolxError::Config(msg),
            other => SolxError::Knowledge(other.to_string()),
        }
    }
}
