//! Battery status

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Snapshot of the Battery Status API
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryStatus {
    /// Charge level (0.0 = empty, 1.0 = full)
    pub level: f32,
    /// Whether the device is plugged in
    pub charging: bool,
}

impl BatteryStatus {
    /// Create a status, clamping the level to [0.0, 1.0]
    pub fn new(level: f32, charging: bool) -> Self {
        let level = if level.is_nan() { 1.0 } else { level.clamp(0.0, 1.0) };
        Self { level, charging }
    }

    /// Create a status, rejecting levels outside [0.0, 1.0]
    pub fn try_new(level: f32, charging: bool) -> Result<Self> {
        if !(0.0..=1.0).contains(&level) {
            return Err(Error::InvalidBatteryLevel(level));
        }
        Ok(Self { level, charging })
    }

    /// Low when discharging below `threshold`
    pub fn is_low(&self, threshold: f32) -> bool {
        !self.charging && self.level < threshold
    }

    /// Charge level as a whole percentage
    pub fn percent(&self) -> u8 {
        (self.level * 100.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_requires_discharging() {
        assert!(BatteryStatus::new(0.15, false).is_low(0.2));
        assert!(!BatteryStatus::new(0.15, true).is_low(0.2));
        assert!(!BatteryStatus::new(0.2, false).is_low(0.2));
    }

    #[test]
    fn test_level_validation() {
        assert_eq!(BatteryStatus::new(1.7, false).level, 1.0);
        assert_eq!(BatteryStatus::new(f32::NAN, false).level, 1.0);
        assert!(BatteryStatus::try_new(-0.1, false).is_err());
        assert_eq!(BatteryStatus::try_new(0.42, true).unwrap().percent(), 42);
    }
}
