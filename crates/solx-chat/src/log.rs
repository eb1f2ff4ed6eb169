//! Append-only conversation history for one session.

use solx_core::types::{ConversationTurn, Role};

/// Ordered record of user and bot turns.
///
/// Turns are only ever appended; reading a window never changes the log.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    turns: Vec<ConversationTurn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a turn at the end of the log.
    pub fn append(&mut self, role: Role, text: impl Into<String>) {
        self.turns.push(ConversationTurn::new(role, text));
    }

    /// The last `n` turns, oldest first.
    pub fn render_window(&self, n: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// Every turn, oldest first.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
