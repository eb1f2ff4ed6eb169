//! Solx Whisper crate - speech-to-text boundary.
//!
//! Provides a trait-based abstraction for turning uploaded audio into query
//! text, an OpenAI-compatible HTTP backend, a stand-in for when no backend is
//! configured, and a mock implementation for tests.

pub mod error;
pub mod openai;

use std::future::Future;
use std::path::Path;

use solx_core::config::TranscriptionConfig;

pub use error::TranscriptionError;
pub use openai::OpenAiTranscriptionService;

// =============================================================================
// Audio format
// =============================================================================

/// Audio containers accepted for transcription, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    M4a,
}

impl AudioFormat {
    /// Infer the container from a filename hint such as `question.m4a`.
    pub fn from_filename(hint: &str) -> Result<Self, TranscriptionError> {
        let ext = Path::new(hint)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "wav" => Ok(Self::Wav),
            "mp3" => Ok(Self::Mp3),
            "m4a" => Ok(Self::M4a),
            _ => Err(TranscriptionError::Failed(format!(
                "unsupported audio format for '{}': expected wav, mp3 or m4a",
                hint
            ))),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
            Self::M4a => "audio/mp4",
        }
    }
}

// =============================================================================
// Trait
// =============================================================================

/// Service for transcribing an uploaded audio file to text.
pub trait TranscriptionService: Send + Sync {
    /// Transcribe raw container bytes. `filename_hint` carries the
    /// extension that identifies the container.
    fn transcribe(
        &self,
        audio: &[u8],
        filename_hint: &str,
    ) -> impl Future<Output = Result<String, TranscriptionError>> + Send;

    /// Whether calls can succeed at all. Hosts use this to hide audio input.
    fn is_available(&self) -> bool {
        true
    }
}

/// Shared checks every backend applies before doing any work.
pub(crate) fn validate_upload(
    audio: &[u8],
    filename_hint: &str,
) -> Result<AudioFormat, TranscriptionError> {
    if audio.is_empty() {
        return Err(TranscriptionError::Failed(
            "Cannot transcribe empty audio data".to_string(),
        ));
    }
    AudioFormat::from_filename(filename_hint)
}

// =============================================================================
// Unconfigured backend
// =============================================================================

/// Stand-in used when no transcription backend is configured.
#[derive(Debug, Clone)]
pub struct UnconfiguredTranscriptionService {
    reason: String,
}

impl UnconfiguredTranscriptionService {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl TranscriptionService for UnconfiguredTranscriptionService {
    async fn transcribe(
        &self,
        _audio: &[u8],
        _filename_hint: &str,
    ) -> Result<String, TranscriptionError> {
        Err(TranscriptionError::Unavailable(self.reason.clone()))
    }

    fn is_available(&self) -> bool {
        false
    }
}

// =============================================================================
// Backend selection
// =============================================================================

/// The backend chosen from configuration at startup.
#[derive(Debug)]
pub enum TranscriptionBackend {
    OpenAi(OpenAiTranscriptionService),
    Unconfigured(UnconfiguredTranscriptionService),
}

impl TranscriptionBackend {
    /// Use the OpenAI-compatible backend when an API key resolves,
    /// otherwise the unconfigured stand-in.
    pub fn from_config(config: &TranscriptionConfig) -> Self {
        match OpenAiTranscriptionService::from_config(config) {
            Ok(service) => Self::OpenAi(service),
            Err(e) => {
                tracing::warn!(error = %e, "Audio transcription disabled");
                Self::Unconfigured(UnconfiguredTranscriptionService::new(e.to_string()))
            }
        }
    }
}

impl TranscriptionService for TranscriptionBackend {
    async fn transcribe(
        &self,
        audio: &[u8],
        filename_hint: &str,
    ) -> Result<String, TranscriptionError> {
        match self {
            Self::OpenAi(s) => s.transcribe(audio, filename_hint).await,
            Self::Unconfigured(s) => s.transcribe(audio, filename_hint).await,
        }
    }

    fn is_available(&self) -> bool {
        match self {
            Self::OpenAi(s) => s.is_available(),
            Self::Unconfigured(s) => s.is_available(),
        }
    }
}

// =============================================================================
// Mock implementation
// =============================================================================

/// Mock transcription service returning a fixed transcript.
///
/// Applies the same upload validation as the real backend so failure paths
/// can be exercised without network access.
#[derive(Debug, Clone)]
pub struct MockTranscriptionService {
    transcript: String,
}

impl MockTranscriptionService {
    pub fn new() -> Self {
        Self::with_transcript("[mock transcription]")
    }

    pub fn with_transcript(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
        }
    }
}

impl Default for MockTranscriptionService {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptionService for MockTranscriptionService {
    async fn transcribe(
        &self,
        audio: &[u8],
        filename_hint: &str,
    ) -> Result<String, TranscriptionError> {
        let format = validate_upload(audio, filename_hint)?;
        tracing::debug!(bytes = audio.len(), ?format, "Mock transcription generated");
        Ok(self.transcript.clone())
    }
}

// =============================================================================
// Tests
// =============================================================================
