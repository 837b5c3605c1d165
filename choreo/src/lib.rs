//! Scroll choreography for the case-study gallery.
//!
//! The gallery is a tall scroll wrapper with a sticky, horizontally laid out
//! track of chapters. This crate turns the host's scroll measurements into
//! presentation parameters: which chapter is active, how far through it the
//! reader is, and how far the track should be translated. The host layer
//! (browser glue, a terminal simulator, whatever) measures the wrapper and
//! applies the outputs; nothing here touches the DOM.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`scroll`] | Pure [`scroll::compute_scroll_state`] and easing helpers |
//! | [`pacing`] | Segment count and hold/transition split |
//! | [`choreographer`] | Stateful driver with chapter-change notifications |
//! | [`consts`] | Default tuning constants |

pub mod choreographer;
pub mod consts;
pub mod pacing;
pub mod scroll;

pub use choreographer::{ChapterChange, Choreographer};
pub use pacing::{Pacing, PacingError};
pub use scroll::{ScrollState, compute_scroll_state, smoothstep, ticker_duration_secs, track_translate_vw};
