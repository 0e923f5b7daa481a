//! Landing page effect simulator
//!
//! Drives a [`PageSession`] over the in-memory page with a manual clock, so a
//! device profile and a frame-rate trace can be replayed without a browser.

use std::collections::BTreeMap;
use std::time::Duration;

use app::{PageConfig, PageSession, TierChange};
use devices::{BatteryStatus, DeviceSignals};
use effects::MemorySurface;
use logic::{EffectKind, EffectTier, RuleId, VisibilityMap, WatchdogEvent};
use serde::Serialize;
use system::{Clock, Instant, ManualClock};

/// Battery reading applied by [`Scenario::battery_drop_at`]
pub const DRAINED_BATTERY: BatteryStatus = BatteryStatus {
    level: 0.1,
    charging: false,
};

/// What to replay
#[derive(Debug, Clone)]
pub struct Scenario {
    pub signals: DeviceSignals,
    /// Frames per second for each simulated second; the last value repeats
    pub fps_trace: Vec<u32>,
    pub duration_s: u32,
    /// Second at which the battery drains below the threshold
    pub battery_drop_at: Option<u32>,
    /// Seconds during which the page is hidden, `start..end`
    pub hidden: Option<(u32, u32)>,
    /// Second at which the contact form is submitted
    pub submit_at: Option<u32>,
}

impl Scenario {
    pub fn new(signals: DeviceSignals) -> Self {
        Self {
            signals,
            fps_trace: vec![60],
            duration_s: 10,
            battery_drop_at: None,
            hidden: None,
            submit_at: None,
        }
    }

    pub fn with_fps(mut self, trace: impl Into<Vec<u32>>) -> Self {
        self.fps_trace = trace.into();
        self
    }

    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration_s = seconds;
        self
    }

    /// Frame rate during `second`, never below 1
    pub fn fps_at(&self, second: u32) -> u32 {
        self.fps_trace
            .get(second as usize)
            .or(self.fps_trace.last())
            .copied()
            .unwrap_or(60)
            .max(1)
    }

    fn is_hidden_at(&self, second: u32) -> bool {
        self.hidden
            .is_some_and(|(start, end)| (start..end).contains(&second))
    }
}

/// One closed watchdog window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FpsPoint {
    pub at: Instant,
    pub fps: u32,
}

/// Outcome of a simulation
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub initial_tier: EffectTier,
    pub final_tier: EffectTier,
    /// Rule behind the final base tier
    pub rule: Option<RuleId>,
    pub watchdog_tripped: bool,
    pub timeline: Vec<TierChange>,
    pub fps_samples: Vec<FpsPoint>,
    pub visibility: VisibilityMap,
    /// Live nodes per spawned effect at the end of the run
    pub live_nodes: BTreeMap<EffectKind, usize>,
    /// Nodes created by effects over the whole run
    pub nodes_created: u64,
    pub frames: u64,
    pub pending_timers: usize,
}

/// Replay `scenario` through a fresh session
pub fn simulate(scenario: &Scenario, config: PageConfig) -> Report {
    let clock = ManualClock::new();
    let mut session = PageSession::new(MemorySurface::landing_page(), config);
    let mut signals = scenario.signals.clone();

    let initial_tier = session
        .start(&signals, clock.now())
        .map_or(EffectTier::Full, |e| e.tier);

    let mut fps_samples = Vec::new();
    let mut frames = 0;
    for second in 0..scenario.duration_s {
        if scenario.battery_drop_at == Some(second) {
            signals.battery = Some(DRAINED_BATTERY);
            session.on_signals_changed(&signals, clock.now());
        }
        let hidden = scenario.is_hidden_at(second);
        if hidden != signals.page_hidden {
            signals.page_hidden = hidden;
            session.on_visibility_change(hidden, clock.now());
        }
        if scenario.submit_at == Some(second) {
            session.on_submit(clock.now());
        }

        let fps = scenario.fps_at(second);
        let frame = Duration::from_secs_f64(1.0 / f64::from(fps));
        for _ in 0..fps {
            clock.advance(frame);
            let now = clock.now();
            session.tick(now);
            if hidden {
                continue;
            }
            frames += 1;
            match session.on_frame(now) {
                WatchdogEvent::Sample { fps } | WatchdogEvent::Tripped { fps } => {
                    fps_samples.push(FpsPoint { at: now, fps });
                }
                WatchdogEvent::Idle => {}
            }
        }
    }

    let live_nodes = EffectKind::ALL
        .into_iter()
        .filter(|kind| kind.class() == logic::EffectClass::Spawned)
        .map(|kind| (kind, session.live_nodes(kind)))
        .collect();
    let evaluation = session.evaluation();

    let report = Report {
        initial_tier,
        final_tier: session.tier(),
        rule: evaluation.and_then(|e| e.rule.clone()),
        watchdog_tripped: session.watchdog().is_tripped(),
        timeline: session.tier_history().to_vec(),
        fps_samples,
        visibility: evaluation.map_or_else(VisibilityMap::empty, |e| e.visibility.clone()),
        live_nodes,
        nodes_created: session.surface().created_count(),
        frames,
        pending_timers: session.pending_timers(),
    };
    tracing::info!(
        initial = %report.initial_tier,
        last = %report.final_tier,
        frames = report.frames,
        "Simulation finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_trace_repeats_last_value() {
        let scenario = Scenario::new(DeviceSignals::desktop()).with_fps(vec![60, 20]);
        assert_eq!(scenario.fps_at(0), 60);
        assert_eq!(scenario.fps_at(1), 20);
        assert_eq!(scenario.fps_at(9), 20);
        assert_eq!(Scenario::new(DeviceSignals::desktop()).with_fps(vec![0]).fps_at(0), 1);
        assert_eq!(Scenario::new(DeviceSignals::desktop()).with_fps(Vec::new()).fps_at(3), 60);
    }

    #[test]
    fn test_hidden_range_is_half_open() {
        let mut scenario = Scenario::new(DeviceSignals::desktop());
        scenario.hidden = Some((2, 4));
        assert!(!scenario.is_hidden_at(1));
        assert!(scenario.is_hidden_at(2));
        assert!(scenario.is_hidden_at(3));
        assert!(!scenario.is_hidden_at(4));
    }
}
