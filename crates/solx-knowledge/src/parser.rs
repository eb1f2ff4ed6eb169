//! Knowledge source parsing.
//!
//! Two layouts are understood:
//!
//! - **Colon**: `topic: answer` per line. A line without a colon is stored
//!   as both its own topic and answer.
//! - **Block**: an uppercase `HEADER:` line opens a topic; the non-blank lines
//!   after it are joined with spaces until the next header.
//!
//! A topic whose answer comes out blank is dropped in either layout.

use solx_core::types::{KnowledgeEntry, KnowledgeFormat};

/// Parse `text` into entries in source order.
///
/// Duplicate topics are returned as-is; the store decides how to merge them.
pub fn parse_source(text: &str, format: KnowledgeFormat) -> Vec<KnowledgeEntry> {
    match resolve_format(text, format) {
        KnowledgeFormat::Block => parse_block(text),
        _ => parse_colon(text),
    }
}

/// Pick a concrete layout for `Auto`.
fn resolve_format(text: &str, format: KnowledgeFormat) -> KnowledgeFormat {
    if format != KnowledgeFormat::Auto {
        return format;
    }
    let first = text.lines().map(str::trim).find(|l| !l.is_empty());
    match first {
        Some(line) if is_block_header(line) => KnowledgeFormat::Block,
        _ => KnowledgeFormat::Colon,
    }
}

fn parse_colon(text: &str) -> Vec<KnowledgeEntry> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match line.split_once(':') {
            Some((topic, answer)) => {
                let answer = answer.trim();
                (!answer.is_empty()).then(|| KnowledgeEntry::new(topic, answer))
            }
            None => Some(KnowledgeEntry::new(line, line)),
        })
        .collect()
}

fn parse_block(text: &str) -> Vec<KnowledgeEntry> {
    let mut entries = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in text.lines().map(str::trim) {
        if is_block_header(line) {
            if let Some((topic, lines)) = current.take() {
                push_block(&mut entries, topic, &lines);
            }
            let header = line.trim_end_matches(':').to_string();
            current = Some((header, Vec::new()));
        } else if !line.is_empty() {
            // Text before the first header has no topic to attach to.
            if let Some((_, ref mut lines)) = current {
                lines.push(line);
            }
        }
    }

    if let Some((topic, lines)) = current {
        push_block(&mut entries, topic, &lines);
    }
    entries
}

fn push_block(entries: &mut Vec<KnowledgeEntry>, topic: String, lines: &[&str]) {
    if lines.is_empty() {
        tracing::debug!(topic = %topic, "Skipping block header with no body");
        return;
    }
    entries.push(KnowledgeEntry::new(topic, lines.join(" ")));
}

/// An uppercase ASCII letters/spaces line ending in a single `:`.
fn is_block_header(line: &str) -> bool {
    let Some(body) = line.strip_suffix(':') else {
        return false;
    };
    body.chars().any(|c| c.is_ascii_uppercase())
        && body.chars().all(|c| c.is_ascii_uppercase() || c == ' ')
}
