//! Stateful driver for the scroll sequence.
//!
//! [`Choreographer`] keeps the previous progress and the last announced
//! chapter as explicit fields, feeds them back into
//! [`compute_scroll_state`], and notifies listeners only when the chapter
//! index actually changes. Sub-chapter progress is available through
//! [`Choreographer::state`] for consumers that need the continuous value.

#[cfg(test)]
#[path = "choreographer_test.rs"]
mod choreographer_test;

use crate::pacing::Pacing;
use crate::scroll::{ScrollState, compute_scroll_state, ticker_duration_secs, track_translate_vw};

/// A change of active chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterChange {
    pub from: usize,
    pub to: usize,
}

type ChapterListener = Box<dyn FnMut(ChapterChange)>;

/// Scroll sequence driver. One per gallery instance.
pub struct Choreographer {
    pacing: Pacing,
    state: ScrollState,
    chapter: usize,
    listeners: Vec<ChapterListener>,
}

impl Default for Choreographer {
    fn default() -> Self {
        Self::new(Pacing::default())
    }
}

impl Choreographer {
    #[must_use]
    pub fn new(pacing: Pacing) -> Self {
        Self { pacing, state: ScrollState::default(), chapter: 0, listeners: Vec::new() }
    }

    /// Register a chapter-change listener. Listeners run in registration order.
    pub fn on_chapter_change(&mut self, listener: impl FnMut(ChapterChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Feed one scroll/resize measurement.
    ///
    /// Does nothing while `scrollable_height <= 0`. Returns the chapter
    /// change, if this tick crossed into a different segment.
    pub fn update(&mut self, offset: f64, scrollable_height: f64) -> Option<ChapterChange> {
        let next = compute_scroll_state(offset, scrollable_height, self.state.progress, &self.pacing)?;
        self.state = next;

        if next.segment_index == self.chapter {
            return None;
        }

        let change = ChapterChange { from: self.chapter, to: next.segment_index };
        self.chapter = next.segment_index;
        tracing::debug!(from = change.from, to = change.to, progress = next.progress, "chapter changed");
        for listener in &mut self.listeners {
            listener(change);
        }
        Some(change)
    }

    #[must_use]
    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    #[must_use]
    pub fn pacing(&self) -> &Pacing {
        &self.pacing
    }

    /// Last announced chapter.
    #[must_use]
    pub fn chapter(&self) -> usize {
        self.chapter
    }

    /// Chapter progress as the whole-percent scan readout.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn scan_percent(&self) -> u8 {
        (self.state.segment_progress.clamp(0.0, 1.0) * 100.0).round() as u8
    }

    /// Telemetry marquee cycle for the latest velocity sample.
    #[must_use]
    pub fn ticker_duration_secs(&self) -> f64 {
        ticker_duration_secs(self.state.velocity)
    }

    /// Track translation for the latest panel offset, in `vw`.
    #[must_use]
    pub fn track_translate_vw(&self) -> f64 {
        track_translate_vw(self.state.panel_offset)
    }
}
