//! Raw signal snapshot

use serde::{Deserialize, Serialize};

use crate::{BatteryStatus, EffectiveConnectionType};

/// Viewport size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

/// Everything the detector reads from the environment at one moment
///
/// Optional fields are `None` when the corresponding browser API is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSignals {
    /// Current viewport size
    pub viewport: Viewport,
    /// `navigator.deviceMemory`, in gigabytes
    pub device_memory_gb: Option<f32>,
    /// `navigator.connection.effectiveType`
    pub connection: Option<EffectiveConnectionType>,
    /// `navigator.userAgent`
    pub user_agent: Option<String>,
    /// Battery status, once the battery API has resolved
    pub battery: Option<BatteryStatus>,
    /// `(prefers-reduced-motion: reduce)` matches
    pub prefers_reduced_motion: bool,
    /// `document.hidden`
    pub page_hidden: bool,
}

impl DeviceSignals {
    /// Signals for a desktop with no optional APIs
    pub fn desktop() -> Self {
        Self::default()
    }

    /// Builder: viewport size
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Viewport::new(width, height);
        self
    }

    /// Builder: device memory hint
    pub fn with_memory(mut self, gigabytes: f32) -> Self {
        self.device_memory_gb = Some(gigabytes);
        self
    }

    /// Builder: connection type
    pub fn with_connection(mut self, connection: EffectiveConnectionType) -> Self {
        self.connection = Some(connection);
        self
    }

    /// Builder: user agent string
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builder: battery status
    pub fn with_battery(mut self, battery: BatteryStatus) -> Self {
        self.battery = Some(battery);
        self
    }

    /// Builder: reduced motion preference
    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.prefers_reduced_motion = reduced;
        self
    }
}
