use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use tokio::sync::mpsc;

use super::*;
use crate::backend::TextStream;
use crate::config::FALLBACK_TEXT;
use crate::types::Role;

// =========================================================================
// MockBackend
// =========================================================================

type ChunkSender = mpsc::UnboundedSender<Result<Bytes, RelayError>>;

enum Script {
    /// Answer immediately with these chunks, then close.
    Reply(Vec<&'static str>),
    /// Answer with whatever the test pushes into the channel.
    Live(mpsc::UnboundedReceiver<Result<Bytes, RelayError>>),
    /// Refuse the request.
    Fail(RelayError),
}

/// Scripts are keyed by the newest user message; anything unscripted gets "ok".
struct MockBackend {
    scripts: Mutex<HashMap<String, Script>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockBackend {
    fn new(scripts: Vec<(&str, Script)>) -> (Self, Arc<Mutex<Vec<ChatRequest>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let scripts = scripts.into_iter().map(|(k, v)| (k.to_owned(), v)).collect();
        let backend = Self { scripts: Mutex::new(scripts), requests: Arc::clone(&requests) };
        (backend, requests)
    }
}

fn channel_stream(rx: mpsc::UnboundedReceiver<Result<Bytes, RelayError>>) -> TextStream {
    futures::stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|item| (item, rx)) }).boxed()
}

#[async_trait::async_trait]
impl CompletionBackend for MockBackend {
    async fn open(&self, request: &ChatRequest) -> Result<TextStream, RelayError> {
        self.requests.lock().unwrap().push(request.clone());
        let key = request.messages.last().map(|t| t.content.clone()).unwrap_or_default();
        let script = self.scripts.lock().unwrap().remove(&key);
        match script {
            Some(Script::Reply(chunks)) => {
                let items: Vec<Result<Bytes, RelayError>> =
                    chunks.into_iter().map(|c| Ok(Bytes::from_static(c.as_bytes()))).collect();
                Ok(futures::stream::iter(items).boxed())
            }
            Some(Script::Live(rx)) => Ok(channel_stream(rx)),
            Some(Script::Fail(err)) => Err(err),
            None => Ok(futures::stream::iter(vec![Ok(Bytes::from_static(b"ok"))]).boxed()),
        }
    }
}

fn live() -> (ChunkSender, Script) {
    let (tx, rx) = mpsc::unbounded_channel();
    (tx, Script::Live(rx))
}

fn chunk(text: &'static str) -> Result<Bytes, RelayError> {
    Ok(Bytes::from_static(text.as_bytes()))
}

fn session(scripts: Vec<(&str, Script)>) -> (ChatSession<MockBackend>, Arc<Mutex<Vec<ChatRequest>>>) {
    let (backend, requests) = MockBackend::new(scripts);
    (ChatSession::new(backend, RelayConfig::default()), requests)
}

async fn settle(rx: &mut watch::Receiver<ChatSnapshot>, state: ChatState) -> ChatSnapshot {
    rx.wait_for(|s| s.state == state).await.unwrap().clone()
}

// =========================================================================
// Happy path
// =========================================================================

#[tokio::test]
async fn starts_idle_and_empty() {
    let (s, _) = session(vec![]);
    let snap = s.snapshot();
    assert_eq!(snap.state, ChatState::Idle);
    assert!(snap.response.is_empty());
    assert!(s.history().is_empty());
}

#[tokio::test]
async fn send_enters_thinking_synchronously() {
    let (tx, script) = live();
    let (s, _) = session(vec![("Hi", script)]);
    s.send_message("Hi");
    let snap = s.snapshot();
    assert_eq!(snap.state, ChatState::Thinking);
    assert!(snap.response.is_empty());
    assert_eq!(s.history(), vec![Turn::user("Hi")]);
    drop(tx);
}

#[tokio::test]
async fn streamed_chunks_accumulate_in_order() {
    let (s, requests) = session(vec![("Hi", Script::Reply(vec!["Hey", " there", ", human!"]))]);
    let mut rx = s.subscribe();
    s.send_message("Hi");

    let done = settle(&mut rx, ChatState::Idle).await;
    assert_eq!(done.response, "Hey there, human!");
    assert_eq!(s.history(), vec![Turn::user("Hi"), Turn::assistant("Hey there, human!")]);

    let sent = requests.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].system.contains("Nuke"));
    assert_eq!(sent[0].messages, vec![Turn::user("Hi")]);
}

#[tokio::test]
async fn streaming_state_observed_while_chunks_arrive() {
    let (tx, script) = live();
    let (s, _) = session(vec![("Hi", script)]);
    let mut rx = s.subscribe();
    s.send_message("Hi");

    tx.send(chunk("Hel")).unwrap();
    let partial = rx.wait_for(|snap| snap.response == "Hel").await.unwrap().clone();
    assert_eq!(partial.state, ChatState::Streaming);

    tx.send(chunk("lo")).unwrap();
    drop(tx);
    let done = settle(&mut rx, ChatState::Idle).await;
    assert_eq!(done.response, "Hello");
}

#[tokio::test]
async fn multibyte_split_across_chunks_decodes() {
    let (tx, script) = live();
    let (s, _) = session(vec![("Hi", script)]);
    let mut rx = s.subscribe();
    s.send_message("Hi");

    let emoji = "👋".as_bytes();
    tx.send(Ok(Bytes::copy_from_slice(&emoji[..1]))).unwrap();
    tx.send(Ok(Bytes::copy_from_slice(&emoji[1..]))).unwrap();
    drop(tx);

    let done = settle(&mut rx, ChatState::Idle).await;
    assert_eq!(done.response, "👋");
}

// =========================================================================
// Supersession
// =========================================================================

#[tokio::test]
async fn newer_message_discards_stale_reply() {
    let (first_tx, first) = live();
    let (second_tx, second) = live();
    let (s, requests) = session(vec![("Hi", first), ("Hello", second)]);
    let mut rx = s.subscribe();

    s.send_message("Hi");
    rx.wait_for(|snap| snap.state == ChatState::Streaming).await.unwrap();

    s.send_message("Hello");
    second_tx.send(chunk("Hello to you")).unwrap();
    drop(second_tx);

    // The superseded stream resolves late.
    first_tx.send(chunk("stale answer to Hi")).ok();
    drop(first_tx);

    let done = settle(&mut rx, ChatState::Idle).await;
    assert_eq!(done.response, "Hello to you");
    tokio::task::yield_now().await;

    let history = s.history();
    assert_eq!(history, vec![Turn::user("Hi"), Turn::user("Hello"), Turn::assistant("Hello to you")]);
    assert!(!history.iter().any(|t| t.content.contains("stale")));
    assert_eq!(s.snapshot().response, "Hello to you");
    assert_eq!(requests.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn cancellation_produces_no_error_state() {
    let (_first_tx, first) = live();
    let (s, _) = session(vec![("one", first), ("two", Script::Reply(vec!["fine"]))]);
    let mut rx = s.subscribe();

    s.send_message("one");
    s.send_message("two");

    let done = settle(&mut rx, ChatState::Idle).await;
    assert_eq!(done.response, "fine");
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    assert_eq!(s.snapshot().state, ChatState::Idle);
}

#[tokio::test]
async fn dispatched_context_never_exceeds_window() {
    let (s, requests) = session(vec![]);
    let mut rx = s.subscribe();

    for i in 0..12 {
        s.send_message(format!("question {i}"));
        settle(&mut rx, ChatState::Idle).await;
    }

    let sent = requests.lock().unwrap();
    assert_eq!(sent.len(), 12);
    for req in sent.iter() {
        assert!(req.messages.len() <= 6, "request carried {} turns", req.messages.len());
        assert_eq!(req.messages.last().map(|t| t.role), Some(Role::User));
    }
    assert_eq!(sent[11].messages.len(), 6);
    assert!(s.history().len() <= 7);
}

// =========================================================================
// Failure
// =========================================================================

#[tokio::test(start_paused = true)]
async fn failure_shows_fallback_then_self_clears() {
    let (s, _) = session(vec![("Hi", Script::Fail(RelayError::Status { status: 500, body: String::new() }))]);
    let mut rx = s.subscribe();
    let started = tokio::time::Instant::now();

    s.send_message("Hi");
    let errored = settle(&mut rx, ChatState::Error).await;
    assert_eq!(errored.response, FALLBACK_TEXT);

    tokio::time::advance(Duration::from_secs(5)).await;
    tokio::task::yield_now().await;
    assert_eq!(s.snapshot().state, ChatState::Error);

    let idle = settle(&mut rx, ChatState::Idle).await;
    assert!(started.elapsed() >= Duration::from_secs(6));
    assert_eq!(idle.response, FALLBACK_TEXT, "fallback stays until the next send");

    s.send_message("again");
    assert!(s.snapshot().response.is_empty());
}

#[tokio::test]
async fn broken_stream_replaces_partial_answer() {
    let (tx, script) = live();
    let (s, _) = session(vec![("Hi", script)]);
    let mut rx = s.subscribe();
    s.send_message("Hi");

    tx.send(chunk("half an ans")).unwrap();
    tx.send(Err(RelayError::Stream("connection reset".into()))).unwrap();

    let errored = settle(&mut rx, ChatState::Error).await;
    assert_eq!(errored.response, FALLBACK_TEXT);
    assert_eq!(s.history(), vec![Turn::user("Hi")]);
}

#[tokio::test(start_paused = true)]
async fn new_send_cancels_pending_error_reset() {
    let (tx, second) = live();
    let (s, _) = session(vec![("Hi", Script::Fail(RelayError::Request("offline".into()))), ("Hello?", second)]);
    let mut rx = s.subscribe();

    s.send_message("Hi");
    settle(&mut rx, ChatState::Error).await;

    s.send_message("Hello?");
    assert_eq!(s.snapshot().state, ChatState::Thinking);

    tokio::time::advance(Duration::from_secs(7)).await;
    tokio::task::yield_now().await;
    assert!(s.snapshot().state.is_busy(), "old timer must not clobber new request");
    drop(tx);
}

// =========================================================================
// Teardown
// =========================================================================

#[tokio::test]
async fn shutdown_discards_in_flight_results() {
    let (tx, script) = live();
    let (s, _) = session(vec![("Hi", script)]);
    let mut rx = s.subscribe();
    s.send_message("Hi");
    rx.wait_for(|snap| snap.state == ChatState::Streaming).await.unwrap();

    s.shutdown();
    tx.send(chunk("too late")).ok();
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    let snap = s.snapshot();
    assert_eq!(snap.state, ChatState::Streaming);
    assert!(snap.response.is_empty());
}

#[tokio::test]
async fn clear_response_returns_to_idle() {
    let (s, _) = session(vec![("Hi", Script::Reply(vec!["hello"]))]);
    let mut rx = s.subscribe();
    s.send_message("Hi");
    settle(&mut rx, ChatState::Idle).await;

    s.clear_response();
    let snap = s.snapshot();
    assert_eq!(snap.state, ChatState::Idle);
    assert!(snap.response.is_empty());
    assert_eq!(snap.history_len, 2);
}

#[tokio::test]
async fn clear_mid_stream_keeps_whole_reply_in_history() {
    let (tx, script) = live();
    let (s, _) = session(vec![("Hi", script)]);
    let mut rx = s.subscribe();
    s.send_message("Hi");

    tx.send(chunk("Hel")).unwrap();
    rx.wait_for(|snap| snap.response == "Hel").await.unwrap();

    s.clear_response();
    let cleared = s.snapshot();
    assert_eq!(cleared.state, ChatState::Idle);
    assert!(cleared.response.is_empty());

    tx.send(chunk("lo")).unwrap();
    let resumed = rx.wait_for(|snap| snap.response == "Hello").await.unwrap().clone();
    assert_eq!(resumed.state, ChatState::Streaming);

    drop(tx);
    let done = rx.wait_for(|snap| snap.history_len == 2).await.unwrap().clone();
    assert_eq!(done.state, ChatState::Idle);
    assert_eq!(done.response, "Hello");
    assert_eq!(s.history(), vec![Turn::user("Hi"), Turn::assistant("Hello")]);
}
