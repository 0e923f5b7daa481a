//! Millisecond timestamps and frame-rate measurement
//!
//! Timestamps are milliseconds on a monotonic timeline, the same unit
//! `performance.now()` and `requestAnimationFrame` report in the browser.
//! Native builds measure from a per-clock origin so both targets share one
//! representation and tests can construct instants directly.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A point in time, in milliseconds since the clock origin
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Instant {
    millis: f64,
}

impl Instant {
    /// The clock origin
    pub const ZERO: Self = Self { millis: 0.0 };

    /// Create an instant from milliseconds since the origin
    #[inline]
    pub const fn from_millis(millis: f64) -> Self {
        Self { millis }
    }

    /// Milliseconds since the origin
    #[inline]
    pub const fn as_millis(&self) -> f64 {
        self.millis
    }

    /// Signed milliseconds between `earlier` and this instant
    #[inline]
    pub fn millis_since(&self, earlier: Instant) -> f64 {
        self.millis - earlier.millis
    }

    /// Duration since an earlier instant, saturating at zero
    pub fn duration_since(&self, earlier: Instant) -> Duration {
        let millis = self.millis_since(earlier).max(0.0);
        Duration::from_secs_f64(millis / 1000.0)
    }

    /// Total ordering, used by the scheduler's queue
    #[inline]
    pub fn total_cmp(&self, other: &Instant) -> std::cmp::Ordering {
        self.millis.total_cmp(&other.millis)
    }
}

impl std::ops::Add<Duration> for Instant {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self {
            millis: self.millis + rhs.as_secs_f64() * 1000.0,
        }
    }
}

impl std::ops::AddAssign<Duration> for Instant {
    fn add_assign(&mut self, rhs: Duration) {
        self.millis += rhs.as_secs_f64() * 1000.0;
    }
}

/// One completed frame-rate measurement window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FpsSample {
    /// Frames per second over the window, rounded to the nearest integer
    pub fps: u32,
    /// When the window closed
    pub at: Instant,
}

/// Frame counter that reports frames-per-second once per window
///
/// Call [`FpsMeter::record_frame`] from every animation frame. Each time at
/// least one window has elapsed since the window started, a sample is
/// produced and a new window begins at that frame.
#[derive(Debug, Clone)]
pub struct FpsMeter {
    /// Length of one measurement window
    window: Duration,
    /// Start of the current window, `None` until the first frame
    window_start: Option<Instant>,
    /// Frames counted in the current window
    frames: u32,
    /// Most recent sample
    last: Option<FpsSample>,
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl FpsMeter {
    /// Create a meter with the given window length
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            window_start: None,
            frames: 0,
            last: None,
        }
    }

    /// Start (or restart) measuring at `now`
    pub fn start(&mut self, now: Instant) {
        self.window_start = Some(now);
        self.frames = 0;
    }

    /// Whether the meter has been started
    #[inline]
    pub fn is_started(&self) -> bool {
        self.window_start.is_some()
    }

    /// Count one frame; returns a sample when a window closes
    ///
    /// The first call on an unstarted meter starts it and counts nothing.
    pub fn record_frame(&mut self, now: Instant) -> Option<FpsSample> {
        let Some(start) = self.window_start else {
            self.start(now);
            return None;
        };

        self.frames += 1;
        let elapsed = now.millis_since(start);
        let window_ms = self.window.as_secs_f64() * 1000.0;
        if elapsed < window_ms || elapsed <= 0.0 {
            return None;
        }

        let fps = (f64::from(self.frames) * 1000.0 / elapsed).round() as u32;
        let sample = FpsSample { fps, at: now };
        self.last = Some(sample);
        self.window_start = Some(now);
        self.frames = 0;
        Some(sample)
    }

    /// The most recent completed sample
    #[inline]
    pub fn last_sample(&self) -> Option<FpsSample> {
        self.last
    }

    /// Frames counted so far in the current window
    #[inline]
    pub fn pending_frames(&self) -> u32 {
        self.frames
    }

    /// Reset to the unstarted state
    pub fn reset(&mut self) {
        self.window_start = None;
        self.frames = 0;
        self.last = None;
    }
}
