//! Completion backends.
//!
//! [`CompletionBackend`] is the seam between the session and the network:
//! it opens one request and hands back the raw response byte stream. The
//! session owns decoding, accumulation, and cancellation. Tests substitute
//! scripted backends.

#[cfg(test)]
#[path = "backend_test.rs"]
mod backend_test;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::types::ChatRequest;

/// Raw response body fragments in arrival order.
pub type TextStream = BoxStream<'static, Result<Bytes, RelayError>>;

/// Provider-neutral async seam for streamed completions. Enables mocking in tests.
#[async_trait::async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send `request` and return the response body stream once the endpoint
    /// has accepted it.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Request`] when the endpoint is unreachable and
    /// [`RelayError::Status`] for a non-success response.
    async fn open(&self, request: &ChatRequest) -> Result<TextStream, RelayError>;
}

// =============================================================================
// HTTP
// =============================================================================

/// Streams from the site's `/api/chat` endpoint over HTTP.
pub struct HttpBackend {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Returns [`RelayError::HttpClientBuild`] if the client cannot be built.
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| RelayError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, endpoint: config.endpoint.clone() })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl CompletionBackend for HttpBackend {
    async fn open(&self, request: &ChatRequest) -> Result<TextStream, RelayError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| RelayError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::Status { status: status.as_u16(), body });
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| RelayError::Stream(e.to_string())))
            .boxed())
    }
}

