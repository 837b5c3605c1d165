//! Chat relay for the mascot widget.
//!
//! DESIGN
//! ======
//! A [`session::ChatSession`] owns a short rolling conversation, forwards it
//! to the site's `/api/chat` endpoint through a [`backend::CompletionBackend`],
//! and publishes a [`types::ChatSnapshot`] on a watch channel as the streamed
//! answer grows. At most one request is live: sending again cancels the
//! previous one, and every I/O-triggered mutation is guarded by a generation
//! check so late results from superseded requests are dropped.
//!
//! The presentation helpers ([`typewriter::Typewriter`], [`mascot::Mascot`])
//! are plain state machines driven by explicit ticks. They never own timers.
//!
//! The request body types in [`types`] are also what the server accepts, so
//! both ends share one definition.

pub mod backend;
pub mod config;
pub mod decode;
pub mod error;
pub mod history;
pub mod mascot;
pub mod session;
pub mod typewriter;
pub mod types;

pub use backend::{CompletionBackend, HttpBackend, TextStream};
pub use config::RelayConfig;
pub use error::RelayError;
pub use session::ChatSession;
pub use types::{ChatRequest, ChatSnapshot, ChatState, Role, Turn};
