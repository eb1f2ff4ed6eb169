//! CLI argument definitions for the Solx assistant.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use solx_core::types::MatcherMode;

/// Solx: answers computer questions from a small knowledge base.
#[derive(Parser, Debug)]
#[command(name = "solx", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Knowledge source file (colon or block format).
    #[arg(short = 'k', long = "knowledge", global = true)]
    pub knowledge: Option<PathBuf>,

    /// Matching strategy: keyword or similarity.
    #[arg(short = 'm', long = "mode", global = true)]
    pub mode: Option<MatcherMode>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Answer a single question and exit.
    Ask {
        /// The question; multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Interactive session. `:history`, `:listen <file>` and `:quit` are
    /// understood besides plain questions.
    Chat,
    /// Transcribe an audio file (wav, mp3, m4a) and answer it.
    Listen {
        /// Path to the recording.
        audio_file: PathBuf,
    },
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > SOLX_CONFIG env var > platform default (~/.solx/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("SOLX_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the knowledge source path.
    ///
    /// Priority: --knowledge flag > config file value. `None` means the
    /// built-in topics.
    pub fn resolve_knowledge(&self, config_source: Option<&str>) -> Option<PathBuf> {
        self.knowledge
            .clone()
            .or_else(|| config_source.map(expand_home))
    }

    /// Resolve the matching strategy.
    ///
    /// Priority: --mode flag > config file value.
    pub fn resolve_mode(&self, config_mode: MatcherMode) -> MatcherMode {
        self.mode.unwrap_or(config_mode)
    }

    /// Resolve the log filter directive.
    ///
    /// Priority: --log-level flag > RUST_LOG env var > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        if let Some(ref level) = self.log_level {
            return level.clone();
        }
        if let Ok(filter) = std::env::var("RUST_LOG") {
            if !filter.trim().is_empty() {
                return filter;
            }
        }
        config_level.to_string()
    }
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let var = "USERPROFILE";
    #[cfg(not(target_os = "windows"))]
    let var = "HOME";
    std::env::var(var).ok().map(PathBuf::from)
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    match home_dir() {
        Some(home) => home.join(".solx").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}
