//! A single conversation: shared resolver plus a private turn log.

use std::sync::Arc;

use chrono::Local;
use serde::Serialize;
use solx_core::types::{ConversationTurn, Role};
use solx_whisper::TranscriptionService;
use uuid::Uuid;

use crate::error::ChatError;
use crate::log::ConversationLog;
use crate::resolver::ResponseResolver;

/// Transcript of an audio question and the answer it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioAnswer {
    pub transcript: String,
    pub answer: String,
}

/// One user's conversation.
///
/// The resolver (and its store) is shared between sessions; the log is not.
#[derive(Debug)]
pub struct ChatSession {
    id: Uuid,
    started_at: i64,
    resolver: Arc<ResponseResolver>,
    log: ConversationLog,
}

impl ChatSession {
    pub fn new(resolver: Arc<ResponseResolver>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Local::now().timestamp(),
            resolver,
            log: ConversationLog::new(),
        }
    }

    /// Answer a typed question and record both turns.
    ///
    /// Nothing is recorded when resolution fails.
    pub fn ask(&mut self, query: &str) -> Result<String, ChatError> {
        let answer = self.resolver.resolve(query)?;
        self.log.append(Role::User, query.trim());
        self.log.append(Role::Bot, answer.clone());
        tracing::debug!(session = %self.id, turns = self.log.len(), "Turn recorded");
        Ok(answer)
    }

    /// Transcribe an uploaded recording, then answer it like a typed question.
    ///
    /// Transcription failures are returned as-is; they never turn into a
    /// fallback answer and never touch the log.
    pub async fn ask_audio<T: TranscriptionService>(
        &mut self,
        service: &T,
        audio: &[u8],
        filename_hint: &str,
    ) -> Result<AudioAnswer, ChatError> {
        let transcript = service.transcribe(audio, filename_hint).await?;
        tracing::info!(session = %self.id, transcript = %transcript, "Audio question transcribed");
        let answer = self.ask(&transcript)?;
        Ok(AudioAnswer { transcript, answer })
    }

    /// The last `n` turns, oldest first.
    pub fn history(&self, n: usize) -> &[ConversationTurn] {
        self.log.render_window(n)
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> i64 {
        self.started_at
    }

    pub fn resolver(&self) -> &Arc<ResponseResolver> {
        &self.resolver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::FallbackPolicy;
    use solx_core::types::MatcherMode;
    use solx_knowledge::{KnowledgeStore, DEFAULT_SIMILARITY_THRESHOLD};
    use solx_whisper::{
        MockTranscriptionService, TranscriptionError, UnconfiguredTranscriptionService,
    };

    fn session() -> ChatSession {
        let resolver = ResponseResolver::new(
            KnowledgeStore::builtin(),
            MatcherMode::Keyword,
            DEFAULT_SIMILARITY_THRESHOLD,
            FallbackPolicy::default(),
        )
        .unwrap();
        ChatSession::new(Arc::new(resolver))
    }

    #[test]
    fn test_new_session_is_empty() {
        let s = session();
        assert!(s.log().is_empty());
        assert_ne!(s.id(), Uuid::nil());
        assert!((s.started_at() - Local::now().timestamp()).abs() < 2);
    }

    #[test]
    fn test_ask_records_user_then_bot() {
        let mut s = session();
        let answer = s.ask("  what is ram  ").unwrap();
        assert_eq!(answer, "RAM stores temporary data for fast access.");

        let turns = s.history(10);
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].text, "what is ram");
        assert_eq!(turns[1].role, Role::Bot);
        assert_eq!(turns[1].text, answer);
    }

    #[test]
    fn test_ask_blank_leaves_log_unchanged() {
        let mut s = session();
        s.ask("cpu").unwrap();
        let before = s.log().len();
        assert!(matches!(s.ask(""), Err(ChatError::EmptyQuery)));
        assert_eq!(s.log().len(), before);
    }

    #[test]
    fn test_fallback_answer_is_recorded() {
        let mut s = session();
        let answer = s.ask("zzqqxx").unwrap();
        assert!(answer.contains("search?q=zzqqxx"));
        assert_eq!(s.log().len(), 2);
    }

    #[test]
    fn test_sessions_do_not_share_logs() {
        let mut a = session();
        let b = ChatSession::new(Arc::clone(a.resolver()));
        a.ask("python").unwrap();
        assert_eq!(a.log().len(), 2);
        assert!(b.log().is_empty());
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn test_ask_audio_answers_transcript() {
        let mut s = session();
        let service = MockTranscriptionService::with_transcript("Tell me about the CPU");
        let reply = s.ask_audio(&service, b"RIFF", "recorded_audio.wav").await.unwrap();
        assert_eq!(reply.transcript, "Tell me about the CPU");
        assert!(reply.answer.contains("brain of the computer"));
        assert_eq!(s.history(10)[0].text, "Tell me about the CPU");
    }

    #[tokio::test]
    async fn test_ask_audio_unavailable_is_not_fallback() {
        let mut s = session();
        let service = UnconfiguredTranscriptionService::new("no API key");
        let err = s.ask_audio(&service, b"RIFF", "q.wav").await.unwrap_err();
        assert!(matches!(
            err,
            ChatError::Transcription(TranscriptionError::Unavailable(_))
        ));
        assert!(s.log().is_empty());
    }

    #[tokio::test]
    async fn test_ask_audio_failure_leaves_log_unchanged() {
        let mut s = session();
        let service = MockTranscriptionService::new();
        let err = s.ask_audio(&service, &[], "q.wav").await.unwrap_err();
        assert!(matches!(
            err,
            ChatError::Transcription(TranscriptionError::Failed(_))
        ));
        assert!(s.log().is_empty());
    }

    #[tokio::test]
    async fn test_ask_audio_blank_transcript_is_empty_query() {
        let mut s = session();
        let service = MockTranscriptionService::with_transcript("   ");
        let err = s.ask_audio(&service, b"RIFF", "q.mp3").await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyQuery));
        assert!(s.log().is_empty());
    }
}
