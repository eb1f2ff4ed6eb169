//! Transcription failure contract.

use solx_core::error::SolxError;

/// Why audio could not be turned into text.
///
/// Neither variant is a "topic not found" answer: callers surface both
/// directly and fall back to text input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranscriptionError {
    /// No backend is configured (for example, no API key).
    #[error("transcription unavailable: {0}")]
    Unavailable(String),
    /// The backend was reached but the call failed.
    #[error("transcription failed: {0}")]
    Failed(String),
}

impl From<TranscriptionError> for SolxError {
    fn from(err: TranscriptionError) -> Self {
        SolxError::Transcription(err.to_string())
    }
}
