//! Solx application binary - composition root.
//!
//! 1. Load configuration from TOML
//! 2. Load the knowledge store (built-in topics when no source is present)
//! 3. Configure the response resolver with the chosen matcher
//! 4. Select the transcription backend
//! 5. Run the requested command against a fresh chat session

mod cli;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use solx_chat::{ChatError, ChatSession, ResponseResolver};
use solx_core::config::SolxConfig;
use solx_core::error::SolxError;
use solx_core::types::{ConversationTurn, Role};
use solx_knowledge::KnowledgeStore;
use solx_whisper::{TranscriptionBackend, TranscriptionService};

use cli::{CliArgs, Command};

/// Extra time granted on top of the HTTP timeout before giving up on a
/// transcription.
const TRANSCRIPTION_GRACE_SECS: u64 = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Configuration is read before tracing starts so its log level applies;
    // the outcome is logged once the subscriber is installed.
    let config_path = args.resolve_config_path();
    let loaded = SolxConfig::load(&config_path);
    let config_level = loaded
        .as_ref()
        .map(|c| c.general.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(args.resolve_log_level(&config_level))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match loaded {
        Ok(config) => config,
        Err(e) if config_path.exists() => {
            tracing::warn!(path = %config_path.display(), error = %e, "Invalid config, using defaults");
            SolxConfig::default()
        }
        Err(_) => {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            SolxConfig::default()
        }
    };

    // Knowledge.
    let source = args.resolve_knowledge(config.knowledge.source.as_deref());
    let store = KnowledgeStore::load_or_default(source.as_deref(), config.knowledge.format);

    // Resolver.
    let mode = args.resolve_mode(config.knowledge.matcher);
    let fallback = config.fallback.clone().into();
    let resolver = ResponseResolver::new(
        store,
        mode,
        config.knowledge.similarity_threshold,
        fallback,
    )
    .map_err(SolxError::from)?;
    let resolver = Arc::new(resolver);

    // Transcription.
    let transcriber = TranscriptionBackend::from_config(&config.transcription);
    let transcription_timeout =
        Duration::from_secs(config.transcription.timeout_secs + TRANSCRIPTION_GRACE_SECS);

    let mut session = ChatSession::new(resolver);
    tracing::info!(session = %session.id(), %mode, "Session started");

    match args.command {
        Command::Ask { question } => {
            let answer = session.ask(&question.join(" ")).map_err(SolxError::from)?;
            println!("{}", answer);
        }
        Command::Listen { audio_file } => {
            let reply = listen(
                &mut session,
                &transcriber,
                &audio_file,
                transcription_timeout,
            )
            .await?;
            println!("You said: {}", reply.transcript);
            println!("{}", reply.answer);
        }
        Command::Chat => {
            run_chat(
                &mut session,
                &transcriber,
                config.chat.history_window,
                transcription_timeout,
            )
            .await?;
        }
    }

    Ok(())
}

/// Read an audio file, transcribe it, and answer the transcript.
///
/// Fails early with a hint to type the question when no backend is
/// configured.
async fn listen(
    session: &mut ChatSession,
    transcriber: &TranscriptionBackend,
    audio_file: &Path,
    timeout: Duration,
) -> Result<solx_chat::AudioAnswer, SolxError> {
    if !transcriber.is_available() {
        return Err(SolxError::Transcription(
            "audio transcription is disabled because no API key is configured; type your question instead"
                .to_string(),
        ));
    }

    let audio = tokio::fs::read(audio_file).await?;
    let hint = audio_file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "audio.wav".to_string());

    match tokio::time::timeout(timeout, session.ask_audio(transcriber, &audio, &hint)).await {
        Ok(result) => result.map_err(SolxError::from),
        Err(_) => Err(SolxError::Transcription(format!(
            "no transcript after {}s",
            timeout.as_secs()
        ))),
    }
}

/// Interactive loop over stdin.
async fn run_chat(
    session: &mut ChatSession,
    transcriber: &TranscriptionBackend,
    history_window: usize,
    timeout: Duration,
) -> Result<(), SolxError> {
    println!("Solx Computer Assistant. Ask about computers; :history, :listen <file>, :quit.");
    if !transcriber.is_available() {
        println!("(Audio transcription disabled: no API key configured. Text input only.)");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            ":quit" | ":exit" => break,
            ":history" => {
                if session.log().is_empty() {
                    println!("(no conversation yet)");
                }
                for turn in session.history(history_window) {
                    println!("{}", render_turn(turn));
                }
            }
            _ if line.starts_with(":listen") => {
                let path = line.trim_start_matches(":listen").trim();
                if path.is_empty() {
                    println!("Usage: :listen <audio file>");
                    continue;
                }
                match listen(session, transcriber, Path::new(path), timeout).await {
                    Ok(reply) => {
                        println!("You said: {}", reply.transcript);
                        println!("Solx: {}", reply.answer);
                    }
                    Err(e) => println!("Transcription failed: {}", e),
                }
            }
            _ => match session.ask(line) {
                Ok(answer) => println!("Solx: {}", answer),
                Err(ChatError::EmptyQuery) => println!("Please type a question."),
                Err(e) => println!("Error: {}", e),
            },
        }
    }

    tracing::info!(session = %session.id(), turns = session.log().len(), "Session ended");
    Ok(())
}

fn render_turn(turn: &ConversationTurn) -> String {
    let time = chrono::DateTime::from_timestamp(turn.created_at, 0)
        .map(|t| t.with_timezone(&chrono::Local).format("%H:%M:%S").to_string())
        .unwrap_or_default();
    let who = match turn.role {
        Role::User => "You",
        Role::Bot => "Solx",
    };
    format!("[{}] {}: {}", time, who, turn.text)
}
