//! LLM types: streaming trait and errors.

use bytes::Bytes;
use futures::stream::BoxStream;
use relay::ChatRequest;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by LLM client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the LLM provider failed before a response arrived.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The LLM provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The response body broke off mid-stream.
    #[error("API stream failed: {0}")]
    Stream(String),

    /// The provider sent an `error` event inside the stream.
    #[error("API stream reported an error: {0}")]
    StreamEvent(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// LLM STREAM TRAIT
// =============================================================================

/// Answer text fragments in arrival order.
pub type DeltaStream = BoxStream<'static, Result<Bytes, LlmError>>;

/// Provider-neutral async trait for streamed chat. Enables mocking in tests.
#[async_trait::async_trait]
pub trait LlmStream: Send + Sync {
    /// Start a streamed completion for `request`.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request cannot be sent or the provider
    /// answers with a non-success status. Failures after streaming has begun
    /// surface as items of the returned stream.
    async fn stream(&self, request: &ChatRequest) -> Result<DeltaStream, LlmError>;
}
