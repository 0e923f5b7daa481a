//! Frame-rate watchdog
//!
//! Samples the frame rate once per window and trips after enough
//! consecutive slow windows. Tripping is one-shot: the watchdog stops
//! sampling and never re-arms within the session.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use system::{FpsMeter, Instant};

/// Watchdog thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchdogConfig {
    /// Windows strictly below this rate count as slow
    pub min_fps: u32,
    /// Slow windows in a row needed to trip
    pub consecutive_windows: u32,
    /// Sample window length in milliseconds
    pub window_ms: u64,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            min_fps: 30,
            consecutive_windows: 2,
            window_ms: 1000,
        }
    }
}

/// Result of feeding one frame to the watchdog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogEvent {
    /// No window closed, or the watchdog is not sampling
    Idle,
    /// A window closed without tripping
    Sample { fps: u32 },
    /// A window closed and the slow streak reached the limit
    Tripped { fps: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Disarmed,
    Armed,
    Tripped,
}

/// Continuously running frame-rate sampler that can force the emergency tier
#[derive(Debug, Clone)]
pub struct FrameRateWatchdog {
    config: WatchdogConfig,
    meter: FpsMeter,
    slow_streak: u32,
    state: State,
}

impl FrameRateWatchdog {
    pub fn new(config: WatchdogConfig) -> Self {
        let meter = FpsMeter::new(Duration::from_millis(config.window_ms.max(1)));
        Self {
            config,
            meter,
            slow_streak: 0,
            state: State::Disarmed,
        }
    }

    pub fn config(&self) -> &WatchdogConfig {
        &self.config
    }

    /// Start sampling at `now`; ignored once tripped
    pub fn start(&mut self, now: Instant) {
        if self.state == State::Tripped {
            return;
        }
        self.meter.start(now);
        self.slow_streak = 0;
        self.state = State::Armed;
        tracing::debug!(min_fps = self.config.min_fps, "Frame-rate watchdog armed");
    }

    /// Stop sampling without tripping
    pub fn disarm(&mut self) {
        if self.state == State::Armed {
            self.state = State::Disarmed;
            self.meter.reset();
            self.slow_streak = 0;
        }
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.state == State::Armed
    }

    #[inline]
    pub fn is_tripped(&self) -> bool {
        self.state == State::Tripped
    }

    /// Slow windows seen in a row so far
    #[inline]
    pub fn slow_streak(&self) -> u32 {
        self.slow_streak
    }

    /// Count one animation frame
    pub fn record_frame(&mut self, now: Instant) -> WatchdogEvent {
        if self.state != State::Armed {
            return WatchdogEvent::Idle;
        }
        let Some(sample) = self.meter.record_frame(now) else {
            return WatchdogEvent::Idle;
        };

        if sample.fps < self.config.min_fps {
            self.slow_streak += 1;
            tracing::trace!(fps = sample.fps, streak = self.slow_streak, "Slow frame window");
        } else {
            self.slow_streak = 0;
        }

        if self.slow_streak >= self.config.consecutive_windows.max(1) {
            self.state = State::Tripped;
            self.meter.reset();
            tracing::warn!(
                fps = sample.fps,
                windows = self.slow_streak,
                "Frame rate too low, forcing emergency tier"
            );
            return WatchdogEvent::Tripped { fps: sample.fps };
        }

        WatchdogEvent::Sample { fps: sample.fps }
    }
}

impl Default for FrameRateWatchdog {
    fn default() -> Self {
        Self::new(WatchdogConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed one window of frames at a fixed rate, returning the last event
    fn run_window(watchdog: &mut FrameRateWatchdog, now: &mut f64, fps: u32) -> WatchdogEvent {
        let step = 1000.0 / f64::from(fps);
        let mut last = WatchdogEvent::Idle;
        for _ in 0..fps {
            *now += step;
            let event = watchdog.record_frame(Instant::from_millis(*now));
            if event != WatchdogEvent::Idle {
                last = event;
            }
        }
        last
    }

    #[test]
    fn test_trips_after_two_slow_windows() {
        let mut watchdog = FrameRateWatchdog::default();
        let mut now = 0.0;
        watchdog.start(Instant::from_millis(now));

        assert_eq!(run_window(&mut watchdog, &mut now, 20), WatchdogEvent::Sample { fps: 20 });
        assert_eq!(watchdog.slow_streak(), 1);
        assert_eq!(run_window(&mut watchdog, &mut now, 20), WatchdogEvent::Tripped { fps: 20 });
        assert!(watchdog.is_tripped());
    }

    #[test]
    fn test_fast_window_resets_streak() {
        let mut watchdog = FrameRateWatchdog::default();
        let mut now = 0.0;
        watchdog.start(Instant::from_millis(now));

        run_window(&mut watchdog, &mut now, 20);
        assert_eq!(run_window(&mut watchdog, &mut now, 50), WatchdogEvent::Sample { fps: 50 });
        assert_eq!(watchdog.slow_streak(), 0);
        run_window(&mut watchdog, &mut now, 20);
        assert!(!watchdog.is_tripped());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut watchdog = FrameRateWatchdog::default();
        let mut now = 0.0;
        watchdog.start(Instant::from_millis(now));

        run_window(&mut watchdog, &mut now, 25);
        run_window(&mut watchdog, &mut now, 25);
        assert!(watchdog.is_tripped());

        let mut watchdog = FrameRateWatchdog::default();
        let mut now = 0.0;
        watchdog.start(Instant::from_millis(now));
        run_window(&mut watchdog, &mut now, 40);
        run_window(&mut watchdog, &mut now, 40);
        assert!(!watchdog.is_tripped());
    }

    #[test]
    fn test_stops_sampling_after_trip() {
        let mut watchdog = FrameRateWatchdog::default();
        let mut now = 0.0;
        watchdog.start(Instant::from_millis(now));
        run_window(&mut watchdog, &mut now, 10);
        run_window(&mut watchdog, &mut now, 10);
        assert!(watchdog.is_tripped());

        assert_eq!(run_window(&mut watchdog, &mut now, 50), WatchdogEvent::Idle);
        watchdog.start(Instant::from_millis(now));
        assert!(watchdog.is_tripped());
        assert!(!watchdog.is_armed());
    }

    #[test]
    fn test_disarmed_is_idle() {
        let mut watchdog = FrameRateWatchdog::default();
        assert_eq!(watchdog.record_frame(Instant::from_millis(5000.0)), WatchdogEvent::Idle);

        watchdog.start(Instant::ZERO);
        watchdog.disarm();
        let mut now = 0.0;
        assert_eq!(run_window(&mut watchdog, &mut now, 10), WatchdogEvent::Idle);
    }
}
