//! Scroll position to presentation parameters.
//!
//! [`compute_scroll_state`] runs on every scroll and resize tick, so it is
//! pure and allocation-free. Callers keep the previous progress themselves
//! and pass it back in to get a velocity.

#[cfg(test)]
#[path = "scroll_test.rs"]
mod scroll_test;

use serde::Serialize;

use crate::consts::{PANEL_WIDTH_VW, TICKER_BASE_SECS, TICKER_MIN_SECS, TICKER_VELOCITY_GAIN};
use crate::pacing::Pacing;

/// Derived scroll state, recomputed on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollState {
    /// Fraction of the wrapper's scrollable distance consumed, in `[0, 1]`.
    pub progress: f64,
    /// Active segment (chapter).
    pub segment_index: usize,
    /// Position within the active segment, in `[0, 1]`.
    pub segment_progress: f64,
    /// Track position in panel widths. Holds, then eases to the next panel.
    pub panel_offset: f64,
    /// `|progress - previous_progress|`.
    pub velocity: f64,
}

/// Map a wrapper scroll measurement to a [`ScrollState`].
///
/// `offset` is how far the wrapper's top has scrolled past the viewport top;
/// `scrollable_height` is the wrapper height minus the viewport height.
/// Returns `None` while layout has not produced a positive scrollable
/// extent; the caller keeps its previous state and retries next tick.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn compute_scroll_state(
    offset: f64,
    scrollable_height: f64,
    previous_progress: f64,
    pacing: &Pacing,
) -> Option<ScrollState> {
    if !scrollable_height.is_finite() || scrollable_height <= 0.0 {
        return None;
    }

    let ratio = offset / scrollable_height;
    let progress = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
    let velocity = (progress - previous_progress).abs();

    let segments = pacing.segments() as f64;
    let last = pacing.last_segment();
    let scaled = progress * segments;
    let segment_index = (scaled.floor() as usize).min(last);
    let segment_progress = (scaled - segment_index as f64).clamp(0.0, 1.0);

    let hold = pacing.hold_fraction();
    let panel_offset = if segment_index == last {
        last as f64
    } else if segment_progress < hold {
        segment_index as f64
    } else {
        let t = (segment_progress - hold) / (1.0 - hold);
        segment_index as f64 + smoothstep(t)
    };

    Some(ScrollState { progress, segment_index, segment_progress, panel_offset, velocity })
}

/// Cubic smoothstep `t²(3 − 2t)`, with `t` clamped to `[0, 1]`.
#[must_use]
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Telemetry marquee cycle time for a given scroll velocity, in seconds.
///
/// Decreases monotonically with velocity and never drops below
/// [`TICKER_MIN_SECS`].
#[must_use]
pub fn ticker_duration_secs(velocity: f64) -> f64 {
    let boost = 1.0 + velocity.abs() * TICKER_VELOCITY_GAIN;
    (TICKER_BASE_SECS / boost).max(TICKER_MIN_SECS)
}

/// Horizontal track translation for a panel offset, in `vw`.
#[must_use]
pub fn track_translate_vw(panel_offset: f64) -> f64 {
    -panel_offset * PANEL_WIDTH_VW
}
