//! Mascot animation and speech-bubble presenter.
//!
//! Maps relay state onto what the mascot is doing and what its bubble says.
//! All timing is expressed as one owned deadline. Scheduling a new expiry
//! replaces the old one, so a superseded timer can never fire. The host
//! drives time by calling [`Mascot::tick`] with the current instant.

#[cfg(test)]
#[path = "mascot_test.rs"]
mod mascot_test;

use std::time::{Duration, Instant};

use crate::types::ChatState;

pub const FLY_IN: Duration = Duration::from_millis(1000);
pub const GREETING_HOLD: Duration = Duration::from_millis(4000);
pub const REPLY_HOLD: Duration = Duration::from_millis(8000);
pub const ERROR_HOLD: Duration = Duration::from_millis(6000);

pub const GREETING_TEXT: &str = "Hi! I'm Nuke 👋";
pub const THINKING_TEXT: &str = "...";

/// What the mascot sprite is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MascotAnim {
    FlyingIn,
    Greeting,
    Idle,
    Thinking,
    Responding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expiry {
    /// Fly-in finished; show the greeting.
    Greet,
    /// Greeting finished; hide it and settle.
    EndGreeting,
    /// Hide the bubble, optionally settling the sprite too.
    HideBubble { settle: bool },
}

#[derive(Debug, Clone)]
pub struct Mascot {
    anim: MascotAnim,
    bubble: Option<String>,
    greeting_done: bool,
    deadline: Option<(Instant, Expiry)>,
}

impl Mascot {
    /// A freshly mounted mascot, flying in as of `now`.
    #[must_use]
    pub fn mount(now: Instant) -> Self {
        Self { anim: MascotAnim::FlyingIn, bubble: None, greeting_done: false, deadline: Some((now + FLY_IN, Expiry::Greet)) }
    }

    #[must_use]
    pub fn anim(&self) -> MascotAnim {
        self.anim
    }

    /// Bubble text, or `None` while the bubble is hidden.
    #[must_use]
    pub fn bubble(&self) -> Option<&str> {
        self.bubble.as_deref()
    }

    #[must_use]
    pub fn is_thinking(&self) -> bool {
        self.anim == MascotAnim::Thinking
    }

    /// Fire the pending expiry if it is due. Returns whether anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some((due, expiry)) = self.deadline else {
            return false;
        };
        if now < due {
            return false;
        }
        self.deadline = None;
        match expiry {
            Expiry::Greet => {
                self.anim = MascotAnim::Greeting;
                self.bubble = Some(GREETING_TEXT.to_owned());
                self.deadline = Some((due + GREETING_HOLD, Expiry::EndGreeting));
            }
            Expiry::EndGreeting => {
                self.anim = MascotAnim::Idle;
                self.bubble = None;
                self.greeting_done = true;
            }
            Expiry::HideBubble { settle } => {
                self.bubble = None;
                if settle {
                    self.anim = MascotAnim::Idle;
                }
            }
        }
        true
    }

    /// Page scrolled. Dismisses the bubble once the greeting is over.
    pub fn on_scroll(&mut self) {
        if self.bubble.is_some() && self.greeting_done {
            self.dismiss();
        }
    }

    /// Hide the bubble and drop any pending expiry.
    pub fn dismiss(&mut self) {
        self.deadline = None;
        self.bubble = None;
    }

    /// Follow a relay state change.
    pub fn on_chat(&mut self, state: ChatState, response: &str, now: Instant) {
        // Any conversation supersedes the intro sequence.
        self.greeting_done = true;
        match state {
            ChatState::Thinking => {
                self.anim = MascotAnim::Thinking;
                self.bubble = Some(THINKING_TEXT.to_owned());
                self.deadline = None;
            }
            ChatState::Streaming => {
                self.anim = MascotAnim::Responding;
                self.bubble = Some(response.to_owned());
                self.deadline = None;
            }
            ChatState::Idle => {
                if !response.is_empty() {
                    self.bubble = Some(response.to_owned());
                    self.deadline = Some((now + REPLY_HOLD, Expiry::HideBubble { settle: true }));
                }
                if matches!(self.anim, MascotAnim::Responding | MascotAnim::Thinking) {
                    self.anim = MascotAnim::Idle;
                }
            }
            ChatState::Error => {
                self.anim = MascotAnim::Idle;
                self.bubble = Some(response.to_owned());
                self.deadline = Some((now + ERROR_HOLD, Expiry::HideBubble { settle: false }));
            }
        }
    }
}
