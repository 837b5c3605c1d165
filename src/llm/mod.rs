//! LLM: streaming adapter behind `/api/chat`.
//!
//! DESIGN
//! ======
//! Configured from environment variables. `LlmClient` pins the model and
//! token budget so handlers only forward the conversation, and implements
//! [`LlmStream`] so routes can be exercised against a mock.

pub mod anthropic;
pub mod config;
pub mod sse;
pub mod types;

use config::LlmConfig;
use relay::ChatRequest;
pub use types::LlmStream;
use types::{DeltaStream, LlmError};

// =============================================================================
// CLIENT
// =============================================================================

/// Streaming chat client bound to one model.
///
/// Configured from environment variables by [`LlmClient::from_env`].
pub struct LlmClient {
    inner: anthropic::AnthropicClient,
    model: String,
    max_tokens: u32,
}

impl LlmClient {
    /// Build an LLM client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::from_config(config)
    }

    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner = anthropic::AnthropicClient::new(config.api_key, config.api_url, config.timeouts)?;
        Ok(Self { inner, model: config.model, max_tokens: config.max_tokens })
    }

    /// Return the configured model name (e.g. `"claude-haiku-4-5-20251001"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl LlmStream for LlmClient {
    async fn stream(&self, request: &ChatRequest) -> Result<DeltaStream, LlmError> {
        self.inner.stream(&self.model, self.max_tokens, request).await
    }
}
