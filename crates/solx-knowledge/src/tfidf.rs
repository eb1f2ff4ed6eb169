//! TF-IDF sentence index.
//!
//! Answer texts are split into sentences and vectorized once. The vocabulary
//! and idf weights are frozen after fitting; queries are projected into the
//! same space and terms the index has never seen carry no weight.

use std::collections::{BTreeSet, HashMap};

use solx_core::types::KnowledgeEntry;
use tracing::info;

use crate::error::KnowledgeError;

/// A sentence in the index together with the topic it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedSentence {
    pub topic: String,
    pub text: String,
}

/// Fitted vocabulary, idf weights, and one L2-normalized vector per sentence.
#[derive(Debug, Clone)]
pub struct SentenceIndex {
    sentences: Vec<IndexedSentence>,
    vocabulary: Vec<String>,
    term_ids: HashMap<String, usize>,
    idf: Vec<f64>,
    vectors: Vec<Vec<f32>>,
}

impl SentenceIndex {
    /// Split every entry's text into sentences and fit over the result.
    pub fn fit(entries: &[KnowledgeEntry]) -> Result<Self, KnowledgeError> {
        let sentences = entries
            .iter()
            .flat_map(|entry| {
                split_sentences(&entry.text)
                    .into_iter()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| IndexedSentence {
                        topic: entry.topic.clone(),
                        text: s.to_string(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        Self::fit_sentences(sentences)
    }

    /// Fit over pre-split sentences.
    ///
    /// Fails when there is nothing to fit: no sentences, or no sentence
    /// contains a single indexable term.
    pub fn fit_sentences(sentences: Vec<IndexedSentence>) -> Result<Self, KnowledgeError> {
        if sentences.is_empty() {
            return Err(KnowledgeError::Configuration(
                "similarity matcher needs a non-empty corpus".to_string(),
            ));
        }

        let tokenized: Vec<Vec<String>> = sentences.iter().map(|s| tokenize(&s.text)).collect();

        let vocabulary: Vec<String> = tokenized
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if vocabulary.is_empty() {
            return Err(KnowledgeError::Configuration(
                "similarity corpus contains no indexable terms".to_string(),
            ));
        }

        let term_ids: HashMap<String, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        // Document frequency: number of sentences containing each term.
        let mut df = vec![0usize; vocabulary.len()];
        for tokens in &tokenized {
            let unique: BTreeSet<usize> = tokens.iter().map(|t| term_ids[t]).collect();
            for id in unique {
                df[id] += 1;
            }
        }

        // Smoothed idf: ln((1 + n) / (1 + df)) + 1.
        let n = sentences.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let mut index = Self {
            sentences,
            vocabulary,
            term_ids,
            idf,
            vectors: Vec::new(),
        };
        index.vectors = tokenized.iter().map(|t| index.weigh(t)).collect();

        info!(
            sentences = index.sentences.len(),
            terms = index.vocabulary.len(),
            "Sentence index fitted"
        );
        Ok(index)
    }

    /// Project `text` into the fitted space.
    pub fn transform(&self, text: &str) -> Vec<f32> {
        self.weigh(&tokenize(text))
    }

    /// Score `query` against every sentence and return the best
    /// `(sentence index, score)`. Ties go to the earliest sentence.
    pub fn best_match(&self, query: &str) -> Option<(usize, f64)> {
        let query_vec = self.transform(query);
        let mut best: Option<(usize, f64)> = None;
        for (i, vector) in self.vectors.iter().enumerate() {
            let score = cosine_similarity(&query_vec, vector).clamp(0.0, 1.0);
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((i, score)),
            }
        }
        best
    }

    pub fn sentences(&self) -> &[IndexedSentence] {
        &self.sentences
    }

    pub fn sentence(&self, index: usize) -> Option<&IndexedSentence> {
        self.sentences.get(index)
    }

    /// Fitted terms in lexicographic order; position is the vector dimension.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Raw counts times idf, L2-normalized. Unknown terms are skipped.
    fn weigh(&self, tokens: &[String]) -> Vec<f32> {
        let mut counts = vec![0u32; self.vocabulary.len()];
        for token in tokens {
            if let Some(&id) = self.term_ids.get(token) {
                counts[id] += 1;
            }
        }

        let weights: Vec<f64> = counts
            .iter()
            .zip(&self.idf)
            .map(|(&c, &idf)| f64::from(c) * idf)
            .collect();
        let norm = weights.iter().map(|w| w * w).sum::<f64>().sqrt();
        if norm == 0.0 {
            return vec![0.0; weights.len()];
        }
        weights.iter().map(|w| (w / norm) as f32).collect()
    }
}

/// Lowercased alphanumeric runs of at least two characters.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Split on `.` `!` `?` followed by whitespace.
pub(crate) fn split_sentences(text: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some(&(_, next)) = chars.peek() {
                if next.is_whitespace() {
                    result.push(&text[start..=i]);
                    start = i + 1;
                }
            }
        }
    }
    if start < text.len() {
        result.push(&text[start..]);
    }
    result
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 on dimension mismatch or if either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum();

    let mag_a: f64 = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}
