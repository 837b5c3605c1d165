//! Character-by-character reveal for the speech bubble.
//!
//! Network chunks arrive in bursts; the bubble types at a steady cadence
//! instead. The host calls [`Typewriter::set_target`] whenever the bubble
//! text changes and [`Typewriter::tick`] every [`CADENCE`].

#[cfg(test)]
#[path = "typewriter_test.rs"]
mod typewriter_test;

use std::time::Duration;

/// Delay between revealed characters.
pub const CADENCE: Duration = Duration::from_millis(25);

#[derive(Debug, Clone, Default)]
pub struct Typewriter {
    target: String,
    /// Byte length of the revealed prefix of `target`; always a char boundary.
    shown: usize,
}

impl Typewriter {
    /// Point the typewriter at new bubble text.
    ///
    /// Text that extends what is already on screen keeps typing from the
    /// current position. Anything else starts over from empty.
    pub fn set_target(&mut self, text: &str) {
        if text == self.target {
            return;
        }
        let keep_going = text.starts_with(self.displayed());
        self.target.clear();
        self.target.push_str(text);
        if !keep_going {
            self.shown = 0;
        }
    }

    /// Reveal one more character. Returns `false` once caught up.
    pub fn tick(&mut self) -> bool {
        match self.target[self.shown..].chars().next() {
            Some(ch) => {
                self.shown += ch.len_utf8();
                true
            }
            None => false,
        }
    }

    /// Blank the bubble (hidden, or the mascot is thinking).
    pub fn reset(&mut self) {
        self.target.clear();
        self.shown = 0;
    }

    #[must_use]
    pub fn displayed(&self) -> &str {
        &self.target[..self.shown]
    }

    #[must_use]
    pub fn is_caught_up(&self) -> bool {
        self.shown == self.target.len()
    }
}
