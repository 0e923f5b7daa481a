//! Condition patterns for tier rules

use devices::DeviceProfile;
use serde::{Deserialize, Serialize};

/// Predicate over a device profile
///
/// A rule fires only when all of its conditions hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    /// User agent matches a low-capability mobile OS signature
    LowCapabilityOs,

    /// Viewport narrower than the mobile breakpoint
    MobileViewport,

    /// Device memory hint below the threshold
    LowMemory,

    /// Effective connection type is one of the slow ones
    SlowConnection,

    /// User prefers reduced motion
    ReducedMotion,

    /// Battery discharging below the threshold
    BatteryLow,

    /// Every inner condition holds
    And(Vec<Condition>),

    /// At least one inner condition holds
    Or(Vec<Condition>),

    Not(Box<Condition>),

    /// Fallback rules
    Always,

    Never,
}

impl Condition {
    /// Evaluate against a profile
    pub fn evaluate(&self, profile: &DeviceProfile) -> bool {
        match self {
            Condition::LowCapabilityOs => profile.is_low_capability_os,
            Condition::MobileViewport => profile.is_mobile_viewport,
            Condition::LowMemory => profile.has_low_memory,
            Condition::SlowConnection => profile.has_slow_connection,
            Condition::ReducedMotion => profile.prefers_reduced_motion,
            Condition::BatteryLow => profile.battery_low,
            Condition::And(conditions) => conditions.iter().all(|c| c.evaluate(profile)),
            Condition::Or(conditions) => conditions.iter().any(|c| c.evaluate(profile)),
            Condition::Not(condition) => !condition.evaluate(profile),
            Condition::Always => true,
            Condition::Never => false,
        }
    }

    /// Small viewport, low memory or slow network
    pub fn low_power() -> Self {
        Condition::Or(vec![
            Condition::MobileViewport,
            Condition::LowMemory,
            Condition::SlowConnection,
        ])
    }

    /// `self && other`, flattening nested conjunctions
    pub fn and(self, other: Condition) -> Self {
        let mut all = self.into_all();
        all.extend(other.into_all());
        Condition::And(all)
    }

    /// `self || other`, flattening nested disjunctions
    pub fn or(self, other: Condition) -> Self {
        let mut any = self.into_any();
        any.extend(other.into_any());
        Condition::Or(any)
    }

    fn into_all(self) -> Vec<Condition> {
        match self {
            Condition::And(all) => all,
            other => vec![other],
        }
    }

    fn into_any(self) -> Vec<Condition> {
        match self {
            Condition::Or(any) => any,
            other => vec![other],
        }
    }

    /// Logical negation; double negation cancels
    pub fn negate(self) -> Self {
        match self {
            Condition::Not(inner) => *inner,
            other => Condition::Not(Box::new(other)),
        }
    }
}

impl Default for Condition {
    fn default() -> Self {
        Condition::Always
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mobile() -> DeviceProfile {
        DeviceProfile {
            is_mobile_viewport: true,
            ..DeviceProfile::default()
        }
    }

    #[test]
    fn test_leaf_conditions() {
        let profile = mobile();
        assert!(Condition::MobileViewport.evaluate(&profile));
        assert!(!Condition::LowMemory.evaluate(&profile));
        assert!(Condition::low_power().evaluate(&profile));
        assert!(!Condition::low_power().evaluate(&DeviceProfile::default()));
    }

    #[test]
    fn test_condition_combinators() {
        let c = Condition::MobileViewport.and(Condition::SlowConnection);
        assert!(matches!(&c, Condition::And(v) if v.len() == 2));
        assert!(!c.evaluate(&mobile()));
        let c = c.and(Condition::LowMemory);
        assert!(matches!(&c, Condition::And(v) if v.len() == 3));

        let c = Condition::MobileViewport.or(Condition::SlowConnection);
        assert!(c.evaluate(&mobile()));

        let c = Condition::MobileViewport.negate();
        assert!(!c.evaluate(&mobile()));
        assert_eq!(c.negate(), Condition::MobileViewport);
    }

    #[test]
    fn test_condition_serialization() {
        let condition = Condition::low_power().and(Condition::BatteryLow.negate());

        let json = serde_json::to_string(&condition).unwrap();
        let deserialized: Condition = serde_json::from_str(&json).unwrap();

        assert_eq!(condition, deserialized);
    }
}
