//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the optional LLM client and the rate limiter. The server keeps no
//! per-visitor state: conversation context travels with every request.

use std::path::PathBuf;
use std::sync::Arc;

use crate::llm::LlmStream;
use crate::rate_limit::RateLimiter;

pub const DEFAULT_SITE_DIR: &str = "dist";

/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    /// Optional LLM client. `None` if `ANTHROPIC_API_KEY` is not configured.
    pub llm: Option<Arc<dyn LlmStream>>,
    /// In-memory rate limiter for chat requests.
    pub rate_limiter: RateLimiter,
    /// Built site served for every non-API path.
    pub site_dir: PathBuf,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Option<Arc<dyn LlmStream>>, rate_limiter: RateLimiter, site_dir: PathBuf) -> Self {
        Self { llm, rate_limiter, site_dir }
    }
}

/// Resolve the directory holding the built site from `SITE_DIR`.
#[must_use]
pub fn site_dir_from_env() -> PathBuf {
    std::env::var("SITE_DIR").map_or_else(|_| PathBuf::from(DEFAULT_SITE_DIR), PathBuf::from)
}

// =============================================================================
// TEST HELPERS
// =============================================================================
