//! End-to-end retrieval tests: knowledge source on disk -> resolver -> session.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use solx_chat::{ChatError, ChatSession, FallbackPolicy, ResponseResolver};
use solx_core::config::SolxConfig;
use solx_core::types::{KnowledgeFormat, MatchScore, MatcherMode, Role};
use solx_knowledge::{KnowledgeStore, DEFAULT_SIMILARITY_THRESHOLD};
use solx_whisper::{MockTranscriptionService, UnconfiguredTranscriptionService};
use tempfile::NamedTempFile;

fn source_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

fn resolver(store: KnowledgeStore, mode: MatcherMode) -> Arc<ResponseResolver> {
    Arc::new(
        ResponseResolver::new(
            store,
            mode,
            DEFAULT_SIMILARITY_THRESHOLD,
            FallbackPolicy::default(),
        )
        .expect("resolver builds"),
    )
}

#[test]
fn colon_source_answers_by_substring() {
    let file = source_file("cpu: x\nram: y\n");
    let store = KnowledgeStore::load(Some(file.path()), KnowledgeFormat::Auto).unwrap();
    assert_eq!(store.lookup_substring("tell me about cpu please").unwrap().text, "x");

    let mut session = ChatSession::new(resolver(store, MatcherMode::Keyword));
    assert_eq!(session.ask("and RAM?").unwrap(), "y");
}

#[test]
fn earlier_generic_key_shadows_later_specific_key() {
    let file = source_file("storage: generic answer\nstorage device: specific answer\n");
    let store = KnowledgeStore::load(Some(file.path()), KnowledgeFormat::Colon).unwrap();
    let r = resolver(store, MatcherMode::Keyword);
    assert_eq!(
        r.resolve("what is a storage device").unwrap(),
        "generic answer"
    );
}

#[test]
fn block_source_loads_and_answers() {
    let file = source_file(
        "OPERATING SYSTEM:\nSoftware that manages hardware.\nIt schedules programs.\n\n\
         GRAPHICS CARD:\nRenders images to the display.\n",
    );
    let store = KnowledgeStore::load(Some(file.path()), KnowledgeFormat::Auto).unwrap();
    assert_eq!(store.len(), 2);

    let r = resolver(store, MatcherMode::Keyword);
    assert_eq!(
        r.resolve("Which graphics card should I buy").unwrap(),
        "Renders images to the display."
    );
}

#[test]
fn header_without_body_never_yields_blank_answer() {
    let file = source_file("GPU:\nCPU:\nBrain.");
    let store = KnowledgeStore::load(Some(file.path()), KnowledgeFormat::Block).unwrap();
    let mut session = ChatSession::new(resolver(store, MatcherMode::Keyword));

    let answer = session.ask("what is a gpu").unwrap();
    assert!(!answer.is_empty());
    assert!(answer.contains("search?q=what+is+a+gpu"));
    assert_eq!(session.log().len(), 2);
    assert_eq!(session.history(1)[0].text, answer);
}

#[test]
fn missing_source_uses_builtin_topics() {
    let store = KnowledgeStore::load(
        Some(Path::new("/definitely/not/here/data.txt")),
        KnowledgeFormat::Auto,
    )
    .unwrap();
    for topic in ["operating system", "cpu", "ram", "python"] {
        assert!(!store.get(topic).unwrap().text.is_empty());
    }
}

#[test]
fn corrupt_source_recovers_to_builtin() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[0xff, 0xfe, 0xfd]).unwrap();
    file.flush().unwrap();

    let store = KnowledgeStore::load_or_default(Some(file.path()), KnowledgeFormat::Auto);
    let r = resolver(store, MatcherMode::Keyword);
    assert!(r.resolve("python").unwrap().contains("programming language"));
}

#[test]
fn unknown_query_falls_back_to_search_link() {
    let r = resolver(KnowledgeStore::builtin(), MatcherMode::Keyword);
    assert!(r.resolve("zzqqxx").unwrap().contains("search?q=zzqqxx"));
    assert!(r
        .resolve("best linux distro")
        .unwrap()
        .contains("?q=best+linux+distro"));
}

#[test]
fn blank_query_is_rejected_without_logging() {
    let mut session = ChatSession::new(resolver(KnowledgeStore::builtin(), MatcherMode::Keyword));
    assert!(matches!(session.ask(""), Err(ChatError::EmptyQuery)));
    assert!(session.log().is_empty());
}

#[test]
fn similarity_mode_selects_identical_sentence() {
    let file = source_file(
        "cpu: The CPU executes instructions. It has several cores.\n\
         ssd: An SSD stores data on flash memory. It has no moving parts.\n",
    );
    let store = KnowledgeStore::load(Some(file.path()), KnowledgeFormat::Colon).unwrap();
    let r = resolver(store, MatcherMode::Similarity);

    let resolution = r
        .resolve_match("An SSD stores data on flash memory.")
        .unwrap();
    assert!(!resolution.result.fallback);
    assert_eq!(resolution.answer, "An SSD stores data on flash memory.");
    match resolution.result.score {
        MatchScore::Similarity(s) => assert!((s - 1.0).abs() < 1e-6),
        other => panic!("unexpected score {:?}", other),
    }

    let weak = r.resolve_match("quantum entanglement").unwrap();
    assert!(weak.result.fallback);
    assert!(weak.answer.contains("?q=quantum+entanglement"));
}

#[test]
fn config_driven_similarity_resolver() {
    let mut config = SolxConfig::default();
    config.knowledge.matcher = MatcherMode::Similarity;
    let r = ResponseResolver::from_config(KnowledgeStore::builtin(), &config).unwrap();
    assert_eq!(r.matcher_name(), "similarity");
}

#[test]
fn history_window_is_chronological_and_bounded() {
    let mut session = ChatSession::new(resolver(KnowledgeStore::builtin(), MatcherMode::Keyword));
    for q in ["cpu", "ram", "python", "zzqqxx", "operating system", "gpu"] {
        session.ask(q).unwrap();
    }
    assert_eq!(session.log().len(), 12);

    let window = session.history(10);
    assert_eq!(window.len(), 10);
    assert_eq!(window[0].text, "ram");
    assert_eq!(window[0].role, Role::User);
    assert_eq!(window[9].role, Role::Bot);
    assert_eq!(session.log().len(), 12);
}

#[tokio::test]
async fn audio_question_flows_through_resolver() {
    let mut session = ChatSession::new(resolver(KnowledgeStore::builtin(), MatcherMode::Keyword));
    let service = MockTranscriptionService::with_transcript("how much ram do I need");
    let reply = session
        .ask_audio(&service, b"ID3", "question.mp3")
        .await
        .unwrap();
    assert!(reply.answer.contains("temporary data"));
    assert_eq!(session.log().len(), 2);

    let unconfigured = UnconfiguredTranscriptionService::new("no API key");
    assert!(session
        .ask_audio(&unconfigured, b"ID3", "question.mp3")
        .await
        .is_err());
    assert_eq!(session.log().len(), 2);
}
