//! OpenAI-compatible transcription backend.
//!
//! Posts the uploaded file as multipart form data to
//! `<api_url>/audio/transcriptions` and reads the `text` field from the JSON
//! reply. Works with OpenAI Whisper and any service exposing the same route.

use std::time::Duration;

use solx_core::config::TranscriptionConfig;

use crate::{validate_upload, TranscriptionError, TranscriptionService};

/// HTTP transcription client.
pub struct OpenAiTranscriptionService {
    /// Base URL without trailing slash (e.g. https://api.openai.com/v1).
    base_url: String,
    api_key: String,
    /// Model: whisper-1, gpt-4o-transcribe, etc.
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiTranscriptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiTranscriptionService")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiTranscriptionService {
    /// Build from configuration.
    ///
    /// # Errors
    /// Returns `TranscriptionError::Unavailable` when no API key resolves
    /// or the HTTP client cannot be constructed.
    pub fn from_config(config: &TranscriptionConfig) -> Result<Self, TranscriptionError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            TranscriptionError::Unavailable(format!(
                "no API key: set transcription.api_key or {}",
                config.api_key_env
            ))
        })?;
        Self::new(
            &config.api_url,
            api_key,
            &config.model,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Create with explicit settings.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TranscriptionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranscriptionError::Unavailable(e.to_string()))?;
        let base_url: String = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/audio/transcriptions", self.base_url)
    }
}

impl TranscriptionService for OpenAiTranscriptionService {
    async fn transcribe(
        &self,
        audio: &[u8],
        filename_hint: &str,
    ) -> Result<String, TranscriptionError> {
        let format = validate_upload(audio, filename_hint)?;

        tracing::debug!(
            bytes = audio.len(),
            mime = format.mime_type(),
            model = %self.model,
            "Sending audio for transcription"
        );

        let part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name(filename_hint.to_string())
            .mime_str(format.mime_type())
            .map_err(|e| TranscriptionError::Failed(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone());

        let res = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::Failed(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(TranscriptionError::Failed(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let json: serde_json::Value = res
            .json()
            .await
            .map_err(|e| TranscriptionError::Failed(e.to_string()))?;
        let text = json
            .get("text")
            .and_then(|t| t.as_str())
            .ok_or_else(|| {
                TranscriptionError::Failed("response is missing the 'text' field".to_string())
            })?
            .trim()
            .to_string();

        tracing::info!(chars = text.len(), "Transcription complete");
        Ok(text)
    }
}
