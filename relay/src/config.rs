//! Relay configuration.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3001/api/chat";
pub const DEFAULT_HISTORY_WINDOW: usize = 6;
pub const DEFAULT_ERROR_RESET_SECS: u64 = 6;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Bubble text shown when a request fails.
pub const FALLBACK_TEXT: &str = "I'm taking a nap right now 😴 but book a call and my team will help!";

/// Persona preamble for the mascot.
pub const MASCOT_PERSONA: &str = "You are Nuke, the AI mascot of Nuclear Marmalade, an AI automation agency. \
You're friendly, energetic, slightly cheeky, and genuinely helpful. \
You speak casually but with confidence. Keep responses to 2-3 sentences MAX \
(they appear in a small speech bubble on a website). You help visitors understand what \
Nuclear Marmalade does: building custom AI agents that handle phone calls, \
emails, scheduling, and business operations. If someone asks about pricing \
or specific projects, encourage them to \"Book a Call\" with the team. \
Never break character. You're a little orange guy in a space suit who loves \
AI and helping businesses automate. Use casual punctuation, occasional emoji.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Full URL of the streaming chat endpoint.
    pub endpoint: String,
    /// System preamble sent with every request.
    pub system_prompt: String,
    /// Turns of context kept at dispatch time, the new user turn included.
    pub history_window: usize,
    /// How long the error bubble stays before the session returns to idle.
    pub error_reset: Duration,
    pub fallback_text: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl RelayConfig {
    /// Default config pointed at `endpoint`.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            system_prompt: MASCOT_PERSONA.to_owned(),
            history_window: DEFAULT_HISTORY_WINDOW,
            error_reset: Duration::from_secs(DEFAULT_ERROR_RESET_SECS),
            fallback_text: FALLBACK_TEXT.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Config for a site root such as `http://localhost:3001`.
    #[must_use]
    pub fn for_site(base_url: &str) -> Self {
        Self::new(format!("{}/api/chat", base_url.trim_end_matches('/')))
    }
}
