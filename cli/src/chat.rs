//! `chat` subcommand: an interactive conversation with the mascot.
//!
//! Lines typed on stdin are sent through a [`ChatSession`]; the mascot's
//! bubble is typed out on stdout at the typewriter cadence. Closing stdin
//! waits for the pending answer, then exits.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use std::io::Write;
use std::time::Instant;

use relay::mascot::Mascot;
use relay::typewriter::CADENCE;
use relay::{ChatSession, ChatSnapshot, HttpBackend, RelayConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::bubble::BubbleView;
use crate::{ChatArgs, CliError};

const QUIT: &str = "/quit";

pub async fn run(base_url: &str, args: ChatArgs) -> Result<(), CliError> {
    let config = RelayConfig { history_window: args.history_window, ..RelayConfig::for_site(base_url) };
    let backend = HttpBackend::new(&config)?;
    tracing::info!(endpoint = backend.endpoint(), "starting chat");

    let session = ChatSession::new(backend, config);
    let mut updates = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    let mut mascot = Mascot::mount(Instant::now());
    let mut view = BubbleView::default();
    let mut ticker = tokio::time::interval(CADENCE);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut input_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                match line? {
                    Some(raw) => {
                        let message = raw.trim();
                        if message == QUIT {
                            break;
                        }
                        if !message.is_empty() {
                            session.send_message(message);
                        }
                    }
                    None => input_open = false,
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                tracing::debug!(state = ?snapshot.state, chars = snapshot.response.len(), "chat update");
                mascot.on_chat(snapshot.state, &snapshot.response, Instant::now());
            }
            _ = ticker.tick() => {
                mascot.tick(Instant::now());
                if let Some(out) = view.step(&mascot) {
                    write!(stdout, "{out}")?;
                    stdout.flush()?;
                }
                if !input_open && drained(&updates, &view) {
                    break;
                }
            }
        }
    }

    session.shutdown();
    writeln!(stdout)?;
    Ok(())
}

/// Every published update has reached the bubble, no request is in flight,
/// and the typewriter has caught up.
fn drained(updates: &watch::Receiver<ChatSnapshot>, view: &BubbleView) -> bool {
    !updates.has_changed().unwrap_or(false) && !updates.borrow().state.is_busy() && view.is_settled()
}
