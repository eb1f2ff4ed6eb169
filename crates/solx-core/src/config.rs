use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, SolxError};
use crate::types::{KnowledgeFormat, MatcherMode};

/// Top-level configuration for the Solx assistant.
///
/// Loaded from `~/.solx/config.toml` by default. Every section falls back to
/// its defaults when omitted, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolxConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub transcription: TranscriptionConfig,
}

impl SolxConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SolxConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject values no component can work with.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.knowledge.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(SolxError::Config(format!(
                "knowledge.similarity_threshold must be within [0, 1], got {}",
                threshold
            )));
        }
        if self.fallback.search_endpoint.trim().is_empty() {
            return Err(SolxError::Config(
                "fallback.search_endpoint cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Knowledge source and matching strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Path to the knowledge source. The built-in set is used when unset
    /// or when the file does not exist.
    pub source: Option<String>,
    /// Source layout.
    pub format: KnowledgeFormat,
    /// Matching strategy, fixed for the lifetime of the resolver.
    pub matcher: MatcherMode,
    /// Minimum cosine score for a similarity match.
    pub similarity_threshold: f64,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            source: Some("data.txt".to_string()),
            format: KnowledgeFormat::Auto,
            matcher: MatcherMode::Keyword,
            similarity_threshold: 0.3,
        }
    }
}

/// Wording of the "not found, search online" response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Text placed before the search link.
    pub prefix: String,
    /// Search URL; `?q=<query>` is appended.
    pub search_endpoint: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            prefix: "I don't have that topic in my knowledge base yet. Try searching online: "
                .to_string(),
            search_endpoint: "https://www.google.com/search".to_string(),
        }
    }
}

/// Conversation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Number of recent turns shown by the history view.
    pub history_window: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { history_window: 10 }
    }
}

/// Speech-to-text backend (OpenAI-compatible transcription API).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// Base URL without the `/audio/transcriptions` suffix.
    pub api_url: String,
    /// API key. Takes precedence over `api_key_env`.
    pub api_key: Option<String>,
    /// Environment variable consulted when `api_key` is unset.
    pub api_key_env: String,
    /// Transcription model name.
    pub model: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl TranscriptionConfig {
    /// Resolve the API key from the config value or the named env var.
    ///
    /// Blank values count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: "whisper-1".to_string(),
            timeout_secs: 60,
        }
    }
}
