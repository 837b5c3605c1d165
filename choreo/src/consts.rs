//! Tuning constants for the case-study scroll sequence.

// ── Pacing ──────────────────────────────────────────────────────

/// Number of chapters laid out side by side on the track.
pub const DEFAULT_SEGMENTS: usize = 3;

/// Share of each segment during which the panel holds still.
pub const DEFAULT_HOLD_FRACTION: f64 = 0.7;

// ── Telemetry ticker ────────────────────────────────────────────

/// Marquee cycle time when the page is at rest, in seconds.
pub const TICKER_BASE_SECS: f64 = 15.0;

/// Fastest allowed marquee cycle, in seconds.
pub const TICKER_MIN_SECS: f64 = 2.0;

/// How strongly scroll velocity shortens the marquee cycle.
pub const TICKER_VELOCITY_GAIN: f64 = 200.0;

// ── Track ───────────────────────────────────────────────────────

/// Track translation per panel, in viewport-width units.
pub const PANEL_WIDTH_VW: f64 = 100.0;
