//! Error types for the conversational layer.

use solx_core::error::SolxError;
use solx_knowledge::KnowledgeError;
use solx_whisper::TranscriptionError;

/// Errors from resolving or recording a turn.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("query cannot be empty")]
    EmptyQuery,
    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
}

impl From<ChatError> for SolxError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyQuery => SolxError::Validation(err.to_string()),
            ChatError::Knowledge(e) => e.into(),
            ChatError::Transcription(e) => e.into(),
        }
    }
}
