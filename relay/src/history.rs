//! Rolling conversation context.
//!
//! Before each new user turn the history is cut to the newest
//! `window - 1` entries, so a request never carries more than `window`
//! turns. Old turns slide out one at a time; nothing is ever reset.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use crate::types::Turn;

#[derive(Debug, Clone)]
pub struct History {
    turns: Vec<Turn>,
    window: usize,
}

impl History {
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self { turns: Vec::new(), window: window.max(1) }
    }

    /// Slide the window and append a user turn.
    pub fn push_user(&mut self, content: impl Into<String>) {
        let keep = self.window - 1;
        if self.turns.len() > keep {
            self.turns.drain(..self.turns.len() - keep);
        }
        self.turns.push(Turn::user(content));
    }

    /// Append the finished assistant answer.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::assistant(content));
    }

    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
