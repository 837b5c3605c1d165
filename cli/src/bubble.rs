//! Terminal rendering of the mascot's speech bubble.
//!
//! The bubble is one output line prefixed with the mascot's name. Growing
//! text is appended in place; any other change starts a fresh line.

#[cfg(test)]
#[path = "bubble_test.rs"]
mod bubble_test;

use relay::mascot::{Mascot, THINKING_TEXT};
use relay::typewriter::Typewriter;

const PROMPT: &str = "nuke> ";

#[derive(Debug, Default)]
pub struct BubbleView {
    typewriter: Typewriter,
    printed: String,
}

impl BubbleView {
    /// Advance one typewriter cadence step. Returns terminal output, if any.
    pub fn step(&mut self, mascot: &Mascot) -> Option<String> {
        let shown = match mascot.bubble() {
            _ if mascot.is_thinking() => {
                self.typewriter.reset();
                THINKING_TEXT
            }
            Some(text) => {
                self.typewriter.set_target(text);
                self.typewriter.tick();
                self.typewriter.displayed()
            }
            None => {
                self.typewriter.reset();
                ""
            }
        };
        render(&mut self.printed, shown)
    }

    /// Whether the typewriter has revealed everything it was given.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.typewriter.is_caught_up()
    }
}

/// Diff `shown` against what is already on screen.
fn render(printed: &mut String, shown: &str) -> Option<String> {
    if shown == printed.as_str() {
        return None;
    }
    let out = if printed.is_empty() {
        format!("{PROMPT}{shown}")
    } else if shown.is_empty() {
        "\n".to_owned()
    } else if let Some(rest) = shown.strip_prefix(printed.as_str()) {
        rest.to_owned()
    } else {
        format!("\n{PROMPT}{shown}")
    };
    printed.clear();
    printed.push_str(shown);
    Some(out)
}
