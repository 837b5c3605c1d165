//! Anthropic Messages API client, streaming flavour.
//!
//! Thin HTTP wrapper for `/v1/messages` with `stream: true`. The event
//! stream is reduced to plain answer text by [`super::sse`].

use std::time::Duration;

use futures::TryStreamExt;
use relay::{ChatRequest, Turn};

use super::config::LlmTimeouts;
use super::sse::extract_deltas;
use super::types::{DeltaStream, LlmError};

const API_VERSION: &str = "2023-06-01";

// =============================================================================
// CLIENT
// =============================================================================

pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl AnthropicClient {
    pub fn new(api_key: String, api_url: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, api_url })
    }

    pub async fn stream(&self, model: &str, max_tokens: u32, request: &ChatRequest) -> Result<DeltaStream, LlmError> {
        let body = request_body(model, max_tokens, request);

        let response = self
            .http
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .map_err(|e| LlmError::ApiRequest(e.to_string()))?;
            return Err(LlmError::ApiResponse { status: status.as_u16(), body: text });
        }

        let raw = response
            .bytes_stream()
            .map_err(|e| LlmError::Stream(e.to_string()));
        Ok(extract_deltas(raw))
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    stream: bool,
    messages: &'a [Turn],
}

fn request_body<'a>(model: &'a str, max_tokens: u32, request: &'a ChatRequest) -> ApiRequest<'a> {
    ApiRequest { model, max_tokens, system: &request.system, stream: true, messages: &request.messages }
}

#[cfg(test)]
#[path = "anthropic_test.rs"]
mod tests;
