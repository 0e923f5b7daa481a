//! Signal source trait for platform-specific probing
//!
//! The browser crate implements [`SignalSource`] on top of `window` and
//! `navigator`. Every read is infallible: implementations return the
//! absent/default value when an API is missing rather than erroring.

use crate::{BatteryStatus, DeviceSignals, EffectiveConnectionType, Viewport};

/// Trait for environment readers (browser APIs, fixtures, simulators)
///
/// # Example
///
/// ```
/// use devices::{classify, SignalSource, StaticSource, Thresholds};
///
/// let mut source = StaticSource::default();
/// source.set_viewport(390, 844);
///
/// let profile = classify(&source, &Thresholds::default());
/// assert!(profile.is_mobile_viewport);
/// ```
pub trait SignalSource {
    /// Current viewport size
    fn viewport(&self) -> Viewport;

    /// Device memory hint in gigabytes
    fn device_memory_gb(&self) -> Option<f32> {
        None
    }

    /// Network effective connection type
    fn effective_connection(&self) -> Option<EffectiveConnectionType> {
        None
    }

    /// User agent string
    fn user_agent(&self) -> Option<String> {
        None
    }

    /// Latest known battery status
    fn battery(&self) -> Option<BatteryStatus> {
        None
    }

    /// Whether the user asked for reduced motion
    fn prefers_reduced_motion(&self) -> bool {
        false
    }

    /// Whether the page is currently hidden
    fn page_hidden(&self) -> bool {
        false
    }

    /// Read every signal at once
    fn snapshot(&self) -> DeviceSignals {
        DeviceSignals {
            viewport: self.viewport(),
            device_memory_gb: self.device_memory_gb(),
            connection: self.effective_connection(),
            user_agent: self.user_agent(),
            battery: self.battery(),
            prefers_reduced_motion: self.prefers_reduced_motion(),
            page_hidden: self.page_hidden(),
        }
    }
}

/// A source where every optional API is absent
///
/// Reports a desktop-sized viewport. Useful as a fallback on platforms
/// without a browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSource;

impl NullSource {
    /// Create a new null source
    pub fn new() -> Self {
        Self
    }
}

impl SignalSource for NullSource {
    fn viewport(&self) -> Viewport {
        Viewport::default()
    }
}

/// A source backed by a settable snapshot
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    signals: DeviceSignals,
}

impl StaticSource {
    /// Create a source that reports `signals`
    pub fn new(signals: DeviceSignals) -> Self {
        Self { signals }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.signals.viewport = Viewport::new(width, height);
    }

    pub fn set_device_memory(&mut self, gigabytes: Option<f32>) {
        self.signals.device_memory_gb = gigabytes;
    }

    pub fn set_connection(&mut self, connection: Option<EffectiveConnectionType>) {
        self.signals.connection = connection;
    }

    pub fn set_user_agent(&mut self, user_agent: Option<String>) {
        self.signals.user_agent = user_agent;
    }

    pub fn set_battery(&mut self, battery: Option<BatteryStatus>) {
        self.signals.battery = battery;
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.signals.prefers_reduced_motion = reduced;
    }

    pub fn set_page_hidden(&mut self, hidden: bool) {
        self.signals.page_hidden = hidden;
    }

    /// The current snapshot
    pub fn signals(&self) -> &DeviceSignals {
        &self.signals
    }
}

impl SignalSource for StaticSource {
    fn viewport(&self) -> Viewport {
        self.signals.viewport
    }

    fn device_memory_gb(&self) -> Option<f32> {
        self.signals.device_memory_gb
    }

    fn effective_connection(&self) -> Option<EffectiveConnectionType> {
        self.signals.connection
    }

    fn user_agent(&self) -> Option<String> {
        self.signals.user_agent.clone()
    }

    fn battery(&self) -> Option<BatteryStatus> {
        self.signals.battery
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.signals.prefers_reduced_motion
    }

    fn page_hidden(&self) -> bool {
        self.signals.page_hidden
    }

    fn snapshot(&self) -> DeviceSignals {
        self.signals.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_source() {
        let source = NullSource::new();
        let signals = source.snapshot();

        assert_eq!(signals.viewport, Viewport::default());
        assert!(signals.device_memory_gb.is_none());
        assert!(signals.connection.is_none());
        assert!(signals.user_agent.is_none());
        assert!(signals.battery.is_none());
        assert!(!signals.prefers_reduced_motion);
        assert!(!signals.page_hidden);
    }

    #[test]
    fn test_static_source_roundtrip() {
        let mut source = StaticSource::default();
        source.set_viewport(800, 600);
        source.set_connection(Some(EffectiveConnectionType::Cellular3g));
        source.set_battery(Some(BatteryStatus::new(0.5, true)));
        source.set_page_hidden(true);

        let signals = source.snapshot();
        assert_eq!(signals.viewport.width, 800);
        assert_eq!(signals.connection, Some(EffectiveConnectionType::Cellular3g));
        assert_eq!(signals.battery.map(|b| b.charging), Some(true));
        assert!(signals.page_hidden);
        assert_eq!(&signals, source.signals());
    }
}
