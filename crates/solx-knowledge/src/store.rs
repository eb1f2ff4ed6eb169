//! Immutable topic/answer store.
//!
//! Built once at startup from a knowledge source or the built-in default
//! set, then shared read-only. Entry order is the order topics first
//! appeared in the source and decides keyword tie-breaks.

use std::collections::HashMap;
use std::path::Path;

use solx_core::types::{normalize_topic, KnowledgeEntry, KnowledgeFormat};
use tracing::{debug, info, warn};

use crate::error::KnowledgeError;
use crate::parser::parse_source;
use crate::tfidf::SentenceIndex;

/// Topics every installation can answer without a source file.
const BUILTIN_ENTRIES: &[(&str, &str)] = &[
    (
        "operating system",
        "An OS manages hardware, memory, files, and programs.",
    ),
    (
        "cpu",
        "The CPU is the brain of the computer responsible for processing instructions.",
    ),
    ("ram", "RAM stores temporary data for fast access."),
    (
        "python",
        "Python is a popular programming language for many tasks.",
    ),
];

/// Ordered, read-only knowledge base.
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    entries: Vec<KnowledgeEntry>,
    positions: HashMap<String, usize>,
    sentence_index: Option<SentenceIndex>,
}

impl KnowledgeStore {
    /// Build a store from entries in insertion order.
    ///
    /// A repeated topic keeps its first position but takes the later text.
    pub fn from_entries(entries: impl IntoIterator<Item = KnowledgeEntry>) -> Self {
        let mut store = Self {
            entries: Vec::new(),
            positions: HashMap::new(),
            sentence_index: None,
        };
        for entry in entries {
            match store.positions.get(&entry.topic) {
                Some(&pos) => {
                    debug!(topic = %entry.topic, "Duplicate topic replaces earlier answer");
                    store.entries[pos].text = entry.text;
                }
                None => {
                    store.positions.insert(entry.topic.clone(), store.entries.len());
                    store.entries.push(entry);
                }
            }
        }
        store
    }

    /// The built-in default set.
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN_ENTRIES
                .iter()
                .map(|(topic, text)| KnowledgeEntry::new(topic, *text)),
        )
    }

    /// Parse source text in the given layout.
    pub fn parse(text: &str, format: KnowledgeFormat) -> Self {
        Self::from_entries(parse_source(text, format))
    }

    /// Load a store from `source`.
    ///
    /// No source, or a path that does not exist, yields the built-in set.
    /// A file that exists but cannot be read, is not UTF-8, or holds no
    /// entries is a [`KnowledgeError::Load`].
    pub fn load(source: Option<&Path>, format: KnowledgeFormat) -> Result<Self, KnowledgeError> {
        let Some(path) = source else {
            info!("No knowledge source configured, using built-in topics");
            return Ok(Self::builtin());
        };
        if !path.exists() {
            info!(path = %path.display(), "Knowledge source not found, using built-in topics");
            return Ok(Self::builtin());
        }

        let text = std::fs::read_to_string(path).map_err(|e| KnowledgeError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let store = Self::parse(&text, format);
        if store.is_empty() {
            return Err(KnowledgeError::Load {
                path: path.to_path_buf(),
                reason: "source contains no entries".to_string(),
            });
        }

        info!(path = %path.display(), topics = store.len(), "Knowledge source loaded");
        Ok(store)
    }

    /// [`load`](Self::load), substituting the built-in set on failure.
    pub fn load_or_default(source: Option<&Path>, format: KnowledgeFormat) -> Self {
        match Self::load(source, format) {
            Ok(store) => store,
            Err(e) => {
                warn!("{}. Using built-in topics.", e);
                Self::builtin()
            }
        }
    }

    /// Fit a sentence index over the answer texts for similarity matching.
    pub fn with_sentence_index(mut self) -> Result<Self, KnowledgeError> {
        self.sentence_index = Some(SentenceIndex::fit(&self.entries)?);
        Ok(self)
    }

    /// First entry, in insertion order, whose topic occurs in the
    /// lowercased query.
    pub fn lookup_substring(&self, query: &str) -> Option<&KnowledgeEntry> {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .find(|entry| query.contains(entry.topic.as_str()))
    }

    /// Exact topic lookup.
    pub fn get(&self, topic: &str) -> Option<&KnowledgeEntry> {
        self.positions
            .get(&normalize_topic(topic))
            .map(|&pos| &self.entries[pos])
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sentence_index(&self) -> Option<&SentenceIndex> {
        self.sentence_index.as_ref()
    }

    /// Fitted vocabulary, empty when no sentence index was built.
    pub fn vocabulary(&self) -> &[String] {
        self.sentence_index
            .as_ref()
            .map(SentenceIndex::vocabulary)
            .unwrap_or(&[])
    }

    /// Per-sentence vectors, empty when no sentence index was built.
    pub fn vectors(&self) -> &[Vec<f32>] {
        self.sentence_index
            .as_ref()
            .map(SentenceIndex::vectors)
            .unwrap_or(&[])
    }
}

impl Default for KnowledgeStore {
    fn default() -> Self {
        Self::builtin()
    }
}
