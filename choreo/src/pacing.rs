//! Segment partition and hold-then-transition split.
//!
//! Every segment of the scroll range spends its first `hold_fraction` with
//! the panel parked, then eases into the next panel over the remainder.

#[cfg(test)]
#[path = "pacing_test.rs"]
mod pacing_test;

use crate::consts::{DEFAULT_HOLD_FRACTION, DEFAULT_SEGMENTS};

/// Rejected pacing parameters.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum PacingError {
    #[error("pacing needs at least one segment")]
    NoSegments,
    #[error("hold fraction must lie in [0, 1), got {0}")]
    HoldOutOfRange(f64),
}

/// Validated pacing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacing {
    segments: usize,
    hold_fraction: f64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self { segments: DEFAULT_SEGMENTS, hold_fraction: DEFAULT_HOLD_FRACTION }
    }
}

impl Pacing {
    /// Build pacing from a segment count and hold fraction.
    ///
    /// # Errors
    ///
    /// Returns [`PacingError`] when `segments` is zero or `hold_fraction`
    /// falls outside `[0, 1)` (NaN included).
    pub fn new(segments: usize, hold_fraction: f64) -> Result<Self, PacingError> {
        if segments == 0 {
            return Err(PacingError::NoSegments);
        }
        if !(0.0..1.0).contains(&hold_fraction) {
            return Err(PacingError::HoldOutOfRange(hold_fraction));
        }
        Ok(Self { segments, hold_fraction })
    }

    #[must_use]
    pub fn segments(&self) -> usize {
        self.segments
    }

    #[must_use]
    pub fn hold_fraction(&self) -> f64 {
        self.hold_fraction
    }

    /// Index of the final segment; the panel is pinned here.
    #[must_use]
    pub fn last_segment(&self) -> usize {
        self.segments - 1
    }

    /// Width of one segment as a fraction of the whole scroll range.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn segment_size(&self) -> f64 {
        1.0 / self.segments as f64
    }
}
