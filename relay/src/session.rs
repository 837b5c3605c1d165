//! Chat session: one per mounted widget.
//!
//! DESIGN
//! ======
//! `send_message` is fire-and-forget: it records the user turn, flips the
//! state to `Thinking`, spawns the request task, and returns. The task
//! streams the answer into the shared state; observers follow along through
//! [`ChatSession::subscribe`].
//!
//! Each dispatch bumps a generation counter and gets its own cancellation
//! token. A newer dispatch cancels the older token, and every mutation the
//! task makes is applied only while its generation is still current. The
//! error-reset timer is a single owned handle, aborted on the next dispatch
//! and on teardown.
//!
//! TRADE-OFFS
//! ==========
//! State lives behind a `std::sync::Mutex` that is only held for short,
//! non-awaiting sections. The task publishes a full snapshot after each
//! chunk, cloning the answer so far; answers are a few sentences long.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::backend::CompletionBackend;
use crate::config::RelayConfig;
use crate::decode::Utf8Decoder;
use crate::error::RelayError;
use crate::history::History;
use crate::types::{ChatRequest, ChatSnapshot, ChatState, Turn};

// =============================================================================
// SHARED STATE
// =============================================================================

struct ActiveRequest {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

struct Inner {
    generation: u64,
    state: ChatState,
    response: String,
    history: History,
    active: Option<ActiveRequest>,
    error_reset: Option<JoinHandle<()>>,
}

impl Inner {
    fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot { state: self.state, response: self.response.clone(), history_len: self.history.len() }
    }

    fn stop_timers(&mut self) {
        if let Some(timer) = self.error_reset.take() {
            timer.abort();
        }
    }

    /// Signal the live request to stop. Its task winds down on its own.
    fn cancel_active(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
        }
    }

    /// Invalidate every outstanding task and stop them outright.
    fn teardown(&mut self) {
        self.generation += 1;
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
            active.task.abort();
        }
        self.stop_timers();
    }
}

struct Shared {
    inner: Mutex<Inner>,
    tx: watch::Sender<ChatSnapshot>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` only if `generation` is still the live request, then publish.
    fn apply(&self, generation: u64, f: impl FnOnce(&mut Inner)) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation {
            return false;
        }
        f(&mut inner);
        self.tx.send_replace(inner.snapshot());
        true
    }

    /// Like [`Shared::apply`], but a stale generation reads as cancellation.
    fn apply_live(&self, generation: u64, f: impl FnOnce(&mut Inner)) -> Result<(), RelayError> {
        if self.apply(generation, f) { Ok(()) } else { Err(RelayError::Cancelled) }
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Mascot chat session. Dropping it cancels any outstanding work.
pub struct ChatSession<B> {
    backend: Arc<B>,
    config: Arc<RelayConfig>,
    shared: Arc<Shared>,
}

impl<B: CompletionBackend + 'static> ChatSession<B> {
    #[must_use]
    pub fn new(backend: B, config: RelayConfig) -> Self {
        let inner = Inner {
            generation: 0,
            state: ChatState::Idle,
            response: String::new(),
            history: History::new(config.history_window),
            active: None,
            error_reset: None,
        };
        let (tx, _rx) = watch::channel(inner.snapshot());
        Self {
            backend: Arc::new(backend),
            config: Arc::new(config),
            shared: Arc::new(Shared { inner: Mutex::new(inner), tx }),
        }
    }

    /// Observe state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ChatSnapshot> {
        self.shared.tx.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> ChatSnapshot {
        self.shared.lock().snapshot()
    }

    /// Current conversation context, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Turn> {
        self.shared.lock().history.turns().to_vec()
    }

    /// Dispatch `message` and return immediately.
    ///
    /// The caller filters out blank input. Any request still in flight is
    /// cancelled first and its late output discarded. Failures surface as
    /// [`ChatState::Error`], never as a return value. Must be called from
    /// within a Tokio runtime.
    pub fn send_message(&self, message: impl Into<String>) {
        let mut inner = self.shared.lock();
        inner.cancel_active();
        inner.stop_timers();

        inner.generation += 1;
        let generation = inner.generation;
        inner.history.push_user(message);
        inner.state = ChatState::Thinking;
        inner.response.clear();
        self.shared.tx.send_replace(inner.snapshot());

        let request = ChatRequest {
            system: self.config.system_prompt.clone(),
            messages: inner.history.turns().to_vec(),
        };
        debug!(generation, turns = request.messages.len(), "dispatching chat request");

        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_request(
            Arc::clone(&self.shared),
            Arc::clone(&self.backend),
            Arc::clone(&self.config),
            request,
            generation,
            cancel.clone(),
        ));
        inner.active = Some(ActiveRequest { cancel, task });
    }

    /// Drop the visible answer and return to idle.
    ///
    /// A request still streaming is not cancelled: its next chunk shows the
    /// whole answer again, and the whole answer is what history records.
    pub fn clear_response(&self) {
        let mut inner = self.shared.lock();
        inner.stop_timers();
        inner.response.clear();
        inner.state = ChatState::Idle;
        self.shared.tx.send_replace(inner.snapshot());
    }

    /// Cancel the live request and any pending timer. Later I/O results are
    /// discarded. Called on drop.
    pub fn shutdown(&self) {
        self.shared.lock().teardown();
    }
}

impl<B> Drop for ChatSession<B> {
    fn drop(&mut self) {
        self.shared.lock().teardown();
    }
}

// =============================================================================
// REQUEST TASK
// =============================================================================

async fn run_request<B: CompletionBackend>(
    shared: Arc<Shared>,
    backend: Arc<B>,
    config: Arc<RelayConfig>,
    request: ChatRequest,
    generation: u64,
    cancel: CancellationToken,
) {
    let outcome = tokio::select! {
        biased;
        () = cancel.cancelled() => Err(RelayError::Cancelled),
        result = stream_reply(&shared, backend.as_ref(), &request, generation) => result,
    };

    match outcome {
        Ok(()) => debug!(generation, "chat reply complete"),
        Err(e) if e.is_cancelled() => debug!(generation, "chat request superseded"),
        Err(e) => {
            warn!(error = %e, generation, "chat request failed");
            fail(&shared, &config, generation);
        }
    }
}

async fn stream_reply<B: CompletionBackend + ?Sized>(
    shared: &Arc<Shared>,
    backend: &B,
    request: &ChatRequest,
    generation: u64,
) -> Result<(), RelayError> {
    let mut stream = backend.open(request).await?;
    shared.apply_live(generation, |inner| inner.state = ChatState::Streaming)?;

    // `response` mirrors `reply`; history records `reply`.
    let mut reply = String::new();
    let mut decoder = Utf8Decoder::default();
    while let Some(chunk) = stream.next().await {
        let text = decoder.push(&chunk?);
        if !text.is_empty() {
            reply.push_str(&text);
            shared.apply_live(generation, |inner| {
                inner.response.clone_from(&reply);
                inner.state = ChatState::Streaming;
            })?;
        }
    }

    reply.push_str(&decoder.finish());
    shared.apply_live(generation, |inner| {
        inner.response.clone_from(&reply);
        inner.history.push_assistant(reply);
        inner.state = ChatState::Idle;
        inner.active = None;
    })
}

fn fail(shared: &Arc<Shared>, config: &RelayConfig, generation: u64) {
    let timer_shared = Arc::clone(shared);
    let delay = config.error_reset;
    shared.apply(generation, |inner| {
        inner.response.clone_from(&config.fallback_text);
        inner.state = ChatState::Error;
        inner.active = None;
        inner.stop_timers();
        inner.error_reset = Some(tokio::spawn(reset_after(timer_shared, generation, delay)));
    });
}

async fn reset_after(shared: Arc<Shared>, generation: u64, delay: Duration) {
    tokio::time::sleep(delay).await;
    let applied = shared.apply(generation, |inner| {
        inner.state = ChatState::Idle;
        inner.error_reset = None;
    });
    if applied {
        debug!(generation, "error bubble cleared");
    }
}
