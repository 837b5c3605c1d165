//! Relay errors.

/// Errors produced while relaying a chat request.
///
/// [`RelayError::Cancelled`] is an expected outcome, not a failure: the
/// session swallows it without touching state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayError {
    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never reached the endpoint.
    #[error("chat request failed: {0}")]
    Request(String),

    /// The endpoint answered with a non-success status.
    #[error("chat endpoint returned status {status}")]
    Status { status: u16, body: String },

    /// The response stream broke mid-answer.
    #[error("chat stream broken: {0}")]
    Stream(String),

    /// A newer message superseded this request.
    #[error("request superseded")]
    Cancelled,
}

impl RelayError {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
