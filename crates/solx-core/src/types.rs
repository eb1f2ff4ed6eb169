//! Domain types shared by the knowledge, chat and app crates.

use std::fmt;
use std::str::FromStr;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::SolxError;

// =============================================================================
// Knowledge
// =============================================================================

/// A single topic/answer pair held by a knowledge store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Normalized topic key (trimmed, lowercased). Unique within a store.
    pub topic: String,
    /// Answer text returned when the topic matches.
    pub text: String,
}

impl KnowledgeEntry {
    /// Build an entry, normalizing the topic key.
    pub fn new(topic: impl AsRef<str>, text: impl Into<String>) -> Self {
        Self {
            topic: normalize_topic(topic.as_ref()),
            text: text.into(),
        }
    }
}

/// Normalize a topic key the way stores and matchers compare them.
pub fn normalize_topic(topic: &str) -> String {
    topic.trim().to_lowercase()
}

/// On-disk layout of a knowledge source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeFormat {
    /// `topic: answer`, one per line.
    Colon,
    /// Uppercase `HEADER:` lines followed by text lines.
    Block,
    /// Block when the first non-blank line is a header, otherwise colon.
    #[default]
    Auto,
}

impl FromStr for KnowledgeFormat {
    type Err = SolxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "colon" => Ok(Self::Colon),
            "block" => Ok(Self::Block),
            "auto" => Ok(Self::Auto),
            other => Err(SolxError::Config(format!(
                "unknown knowledge format '{}': expected colon, block or auto",
                other
            ))),
        }
    }
}

// =============================================================================
// Matching
// =============================================================================

/// Which matching strategy a resolver is paired with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatcherMode {
    /// First topic key contained in the query wins.
    #[default]
    Keyword,
    /// TF-IDF cosine ranking over answer sentences.
    Similarity,
}

impl fmt::Display for MatcherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatcherMode::Keyword => write!(f, "keyword"),
            MatcherMode::Similarity => write!(f, "similarity"),
        }
    }
}

impl FromStr for MatcherMode {
    type Err = SolxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keyword" => Ok(Self::Keyword),
            "similarity" | "vector" => Ok(Self::Similarity),
            other => Err(SolxError::Config(format!(
                "unknown matcher mode '{}': expected keyword or similarity",
                other
            ))),
        }
    }
}

/// How confident a match is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MatchScore {
    /// Topic key found verbatim in the query.
    Exact,
    /// Cosine similarity in `[0, 1]`.
    Similarity(f64),
    /// Nothing was scored (blank query or no candidate).
    None,
}

/// Outcome of running a matcher over a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The entry to answer with. For similarity matches `text` holds the
    /// winning sentence rather than the full answer.
    pub entry: Option<KnowledgeEntry>,
    pub score: MatchScore,
    /// True when no confident match exists and the caller should fall back.
    pub fallback: bool,
}

impl MatchResult {
    /// A confident match on `entry`.
    pub fn matched(entry: KnowledgeEntry, score: MatchScore) -> Self {
        Self {
            entry: Some(entry),
            score,
            fallback: false,
        }
    }

    /// No match at all.
    pub fn fallback() -> Self {
        Self {
            entry: None,
            score: MatchScore::None,
            fallback: true,
        }
    }

    /// A scored candidate that did not clear the threshold.
    pub fn below_threshold(score: f64) -> Self {
        Self {
            entry: None,
            score: MatchScore::Similarity(score),
            fallback: true,
        }
    }
}

// =============================================================================
// Conversation
// =============================================================================

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Bot => write!(f, "bot"),
        }
    }
}

/// One message in a session's conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
    /// Epoch seconds (local clock) when the turn was recorded.
    pub created_at: i64,
}

impl ConversationTurn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            created_at: Local::now().timestamp(),
        }
    }
}
