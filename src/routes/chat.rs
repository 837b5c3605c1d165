//! `POST /api/chat`: streaming proxy to the LLM provider.
//!
//! The response body is plain UTF-8 answer text, written as fragments arrive.
//! Errors detected before the first byte map to JSON `{"error": ...}`
//! bodies. A failure after streaming has begun aborts the body.

use std::net::SocketAddr;

use axum::Json;
use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::StatusCode;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use futures::TryStreamExt;
use relay::ChatRequest;

use crate::llm::types::LlmError;
use crate::rate_limit::RateLimitError;
use crate::state::AppState;

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("ANTHROPIC_API_KEY not set")]
    NotConfigured,
    #[error(transparent)]
    RateLimited(#[from] RateLimitError),
    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl ChatError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::NotConfigured => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            Self::RateLimited(e) => (StatusCode::TOO_MANY_REQUESTS, e.to_string()),
            Self::Llm(LlmError::ApiResponse { status, body }) => {
                (StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY), body.clone())
            }
            Self::Llm(_) => (StatusCode::BAD_GATEWAY, "upstream request failed".to_string()),
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::warn!(error = %self, %status, "chat request failed");
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

// =============================================================================
// HANDLER
// =============================================================================

/// Forward the visitor's conversation upstream and stream the answer back.
pub async fn chat(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, ChatError> {
    let llm = state.llm.as_ref().ok_or(ChatError::NotConfigured)?;
    state.rate_limiter.check_and_record(peer.ip())?;

    tracing::debug!(client = %peer.ip(), turns = request.messages.len(), "proxying chat request");
    let deltas = llm
        .stream(&request)
        .await?
        .inspect_err(|e| tracing::warn!(error = %e, "chat stream aborted"));

    let headers = [(CONTENT_TYPE, "text/plain; charset=utf-8"), (CACHE_CONTROL, "no-cache")];
    Ok((headers, Body::from_stream(deltas)).into_response())
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
