//! Server-sent event parsing for the Anthropic streaming response.
//!
//! DESIGN
//! ======
//! The upstream body is a sequence of `event:` / `data:` lines. Only the
//! `data:` payloads matter, and of those only `content_block_delta` events
//! carrying text. Network chunks split lines anywhere, so [`SseDeltas`]
//! buffers raw bytes and parses complete lines only. A newline byte never
//! occurs inside a multi-byte UTF-8 sequence, so every complete line is
//! valid to decode on its own.

use bytes::Bytes;
use futures::{Stream, StreamExt, stream};
use serde::Deserialize;

use super::types::{DeltaStream, LlmError};

const DATA_PREFIX: &str = "data: ";
const DONE_MARKER: &str = "[DONE]";

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Deserialize)]
#[serde(tag = "type")]
enum StreamEvent {
    #[serde(rename = "content_block_delta")]
    ContentBlockDelta { delta: Delta },
    #[serde(rename = "error")]
    Error { error: ErrorBody },
    /// `message_start`, `ping`, `content_block_stop`, and friends.
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct Delta {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

// =============================================================================
// LINE PARSER
// =============================================================================

/// Incremental extractor of answer text from raw SSE bytes.
#[derive(Debug, Default)]
pub struct SseDeltas {
    pending: Vec<u8>,
}

impl SseDeltas {
    /// Feed one network chunk; returns the text of every delta it completed.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::StreamEvent`] when the provider reports an error
    /// inside the stream.
    pub fn push(&mut self, chunk: &[u8]) -> Result<String, LlmError> {
        self.pending.extend_from_slice(chunk);
        let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') else {
            return Ok(String::new());
        };
        let complete: Vec<u8> = self.pending.drain(..=last_newline).collect();
        extract_text(&complete)
    }

    /// Parse whatever is left once the upstream body ends.
    ///
    /// # Errors
    ///
    /// Same as [`SseDeltas::push`].
    pub fn finish(&mut self) -> Result<String, LlmError> {
        let rest = std::mem::take(&mut self.pending);
        extract_text(&rest)
    }
}

fn extract_text(bytes: &[u8]) -> Result<String, LlmError> {
    let mut out = String::new();
    for line in String::from_utf8_lossy(bytes).lines() {
        if let Some(text) = parse_line(line)? {
            out.push_str(&text);
        }
    }
    Ok(out)
}

/// Interpret one SSE line. Non-data lines, the `[DONE]` marker, and
/// unparseable payloads yield `None`.
fn parse_line(line: &str) -> Result<Option<String>, LlmError> {
    let Some(data) = line.strip_prefix(DATA_PREFIX) else {
        return Ok(None);
    };
    if data == DONE_MARKER {
        return Ok(None);
    }
    match serde_json::from_str::<StreamEvent>(data) {
        Ok(StreamEvent::ContentBlockDelta { delta }) => Ok(delta.text.filter(|t| !t.is_empty())),
        Ok(StreamEvent::Error { error }) => Err(LlmError::StreamEvent(error.message)),
        Ok(StreamEvent::Other) => Ok(None),
        Err(e) => {
            tracing::debug!(error = %e, "skipping unparseable SSE payload");
            Ok(None)
        }
    }
}

// =============================================================================
// STREAM ADAPTER
// =============================================================================

struct Extract {
    upstream: DeltaStream,
    parser: SseDeltas,
    done: bool,
}

/// Turn a raw SSE byte stream into a stream of answer text fragments.
///
/// The stream ends after the first error.
pub fn extract_deltas<S>(upstream: S) -> DeltaStream
where
    S: Stream<Item = Result<Bytes, LlmError>> + Send + 'static,
{
    let init = Extract { upstream: upstream.boxed(), parser: SseDeltas::default(), done: false };
    stream::unfold(init, |mut st| async move {
        if st.done {
            return None;
        }
        loop {
            let parsed = match st.upstream.next().await {
                Some(Ok(chunk)) => st.parser.push(&chunk),
                Some(Err(e)) => Err(e),
                None => {
                    st.done = true;
                    st.parser.finish()
                }
            };
            match parsed {
                Ok(text) if text.is_empty() => {
                    if st.done {
                        return None;
                    }
                }
                Ok(text) => return Some((Ok(Bytes::from(text)), st)),
                Err(e) => {
                    st.done = true;
                    return Some((Err(e), st));
                }
            }
        }
    })
    .boxed()
}

#[cfg(test)]
#[path = "sse_test.rs"]
mod tests;
