//! Bounded conversation history.

use std::collections::VecDeque;

/// One completed exchange: what the user typed and the full reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub human: String,
    pub assistant: String,
}

/// Ordered history of recent turns, rendered into the context block that
/// precedes each new prompt.
///
/// Storage is capped at the render window: a turn older than `max_turns`
/// can never appear in context, so it is evicted on append and memory stays
/// bounded in long sessions.
#[derive(Debug)]
pub struct ConversationSession {
    turns: VecDeque<Turn>,
    max_turns: usize,
}

impl ConversationSession {
    pub fn new(max_turns: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(max_turns),
            max_turns,
        }
    }

    /// Render the stored turns as alternating `Human:`/`Assistant:` labeled
    /// lines, oldest first. Empty string when no turns are stored.
    pub fn render_context(&self) -> String {
        self.turns
            .iter()
            .map(|turn| format!("Human: {}\nAssistant: {}", turn.human, turn.assistant))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Append a completed exchange, evicting the oldest turn beyond the cap.
    /// Neither field is validated; both may be empty.
    pub fn record_turn(&mut self, human: String, assistant: String) {
        if self.max_turns == 0 {
            return;
        }
        while self.turns.len() >= self.max_turns {
            self.turns.pop_front();
        }
        self.turns.push_back(Turn { human, assistant });
    }

    /// Clear all history.
    pub fn reset(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }
}
