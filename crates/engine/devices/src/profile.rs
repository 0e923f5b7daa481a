//! Thresholds and the device classifier

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{DeviceSignals, EffectiveConnectionType, SignalSource};

/// Classification thresholds
///
/// Deserializes from the `[detection]` section of the page configuration;
/// every field falls back to its default when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Viewports narrower than this are mobile
    pub mobile_viewport_px: u32,
    /// Device memory below this (GB) is low
    pub low_memory_gb: f32,
    /// Connection types that count as slow
    pub slow_connections: Vec<EffectiveConnectionType>,
    /// User-agent fragments of low-capability mobile operating systems
    pub low_capability_signatures: Vec<String>,
    /// Battery level below which a discharging battery is low
    pub low_battery_level: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            mobile_viewport_px: 768,
            low_memory_gb: 4.0,
            slow_connections: vec![
                EffectiveConnectionType::Slow2g,
                EffectiveConnectionType::Cellular2g,
                EffectiveConnectionType::Cellular3g,
            ],
            low_capability_signatures: vec!["android".to_string()],
            low_battery_level: 0.2,
        }
    }
}

/// Derived capability flags for one evaluation
///
/// Computed fresh from a [`DeviceSignals`] snapshot every time; battery and
/// connection change at runtime, so callers re-classify on change events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub is_mobile_viewport: bool,
    pub has_low_memory: bool,
    pub has_slow_connection: bool,
    pub is_low_capability_os: bool,
    pub prefers_reduced_motion: bool,
    pub battery_low: bool,
}

impl DeviceProfile {
    /// Classify a signal snapshot
    pub fn classify(signals: &DeviceSignals, thresholds: &Thresholds) -> Self {
        let profile = Self {
            is_mobile_viewport: signals.viewport.width < thresholds.mobile_viewport_px,
            has_low_memory: signals
                .device_memory_gb
                .is_some_and(|gb| gb < thresholds.low_memory_gb),
            has_slow_connection: signals
                .connection
                .is_some_and(|c| thresholds.slow_connections.contains(&c)),
            is_low_capability_os: signals.user_agent.as_deref().is_some_and(|ua| {
                matches_signature(ua, &thresholds.low_capability_signatures)
            }),
            prefers_reduced_motion: signals.prefers_reduced_motion,
            battery_low: signals
                .battery
                .is_some_and(|b| b.is_low(thresholds.low_battery_level)),
        };
        debug!(?profile, "Classified device");
        profile
    }

    /// Small viewport, low memory or slow network
    pub fn is_low_power(&self) -> bool {
        self.is_mobile_viewport || self.has_low_memory || self.has_slow_connection
    }
}

/// Classify whatever a signal source currently reports
pub fn classify(source: &dyn SignalSource, thresholds: &Thresholds) -> DeviceProfile {
    DeviceProfile::classify(&source.snapshot(), thresholds)
}

/// Case-insensitive substring match against a list of signatures
pub fn matches_signature(user_agent: &str, signatures: &[String]) -> bool {
    let user_agent = user_agent.to_ascii_lowercase();
    signatures
        .iter()
        .filter(|sig| !sig.is_empty())
        .any(|sig| user_agent.contains(&sig.to_ascii_lowercase()))
}
