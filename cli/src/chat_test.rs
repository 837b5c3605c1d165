use std::time::{Duration, Instant};

use relay::ChatState;
use relay::mascot::FLY_IN;

use super::*;

fn snapshot(state: ChatState, response: &str) -> ChatSnapshot {
    ChatSnapshot { state, response: response.to_owned(), history_len: 0 }
}

#[test]
fn unseen_final_update_is_not_drained() {
    let (tx, mut rx) = watch::channel(snapshot(ChatState::Streaming, "Hel"));
    rx.borrow_and_update();

    let t0 = Instant::now();
    let mut mascot = Mascot::mount(t0);
    let mut view = BubbleView::default();
    let now = t0 + FLY_IN + Duration::from_millis(10);
    mascot.on_chat(ChatState::Streaming, "Hel", now);
    while view.step(&mascot).is_some() {}
    assert!(view.is_settled());

    // Completion lands while the bubble still shows the partial text.
    tx.send_replace(snapshot(ChatState::Idle, "Hello"));
    assert!(!drained(&rx, &view));

    let last = rx.borrow_and_update().clone();
    mascot.on_chat(last.state, &last.response, now);
    view.step(&mascot);
    assert!(!drained(&rx, &view), "typewriter still owes the tail");

    while view.step(&mascot).is_some() {}
    assert!(drained(&rx, &view));
}

#[test]
fn busy_session_is_not_drained() {
    let (_tx, mut rx) = watch::channel(snapshot(ChatState::Thinking, ""));
    rx.borrow_and_update();
    assert!(!drained(&rx, &BubbleView::default()));
}

#[test]
fn idle_session_with_nothing_pending_is_drained() {
    let (_tx, mut rx) = watch::channel(snapshot(ChatState::Idle, ""));
    rx.borrow_and_update();
    assert!(drained(&rx, &BubbleView::default()));
}
