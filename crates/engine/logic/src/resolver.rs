//! Priority-ordered tier resolution

use devices::DeviceProfile;
use serde::Serialize;

use crate::{Condition, EffectTier, Error, Result, RuleId, TierRule};

/// Outcome of resolving a profile against the rule set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub tier: EffectTier,
    /// Rule that decided the tier; `None` when nothing matched
    pub rule: Option<RuleId>,
}

/// Ordered rule set that maps a device profile to an effect tier
///
/// Rules are kept sorted by priority (descending) and id, so resolution is
/// a single pass that stops at the first enabled match.
#[derive(Debug, Clone, Default)]
pub struct TierResolver {
    rules: Vec<TierRule>,
}

impl TierResolver {
    /// Create a resolver with no rules; everything resolves to `Full`
    pub fn new() -> Self {
        TierResolver::default()
    }

    /// The landing page's rule set
    ///
    /// 1. low-capability mobile OS → `Minimal`
    /// 2. small viewport, low memory or slow network → `Reduced`
    /// 3. otherwise → `Full`
    pub fn standard() -> Self {
        let rules = vec![
            TierRule::new("low_capability_os")
                .with_description("Low-capability mobile OS disables decorative effects")
                .with_priority(30)
                .when(Condition::LowCapabilityOs)
                .assign(EffectTier::Minimal),
            TierRule::new("constrained_device")
                .with_description("Small viewport, low memory or slow network")
                .with_priority(20)
                .when(Condition::low_power())
                .assign(EffectTier::Reduced),
            TierRule::new("default")
                .with_description("Everything else gets every effect")
                .when(Condition::Always)
                .assign(EffectTier::Full),
        ];

        let mut resolver = TierResolver::new();
        for rule in rules {
            resolver.insert_sorted(rule);
        }
        resolver
    }

    /// Add a rule, keeping priority order
    pub fn add_rule(&mut self, rule: TierRule) -> Result<()> {
        if self.get_rule(rule.id()).is_some() {
            return Err(Error::DuplicateRule(rule.id().to_string()));
        }
        self.insert_sorted(rule);
        Ok(())
    }

    /// Remove a rule by id
    pub fn remove_rule(&mut self, id: &str) -> Result<TierRule> {
        match self.rules.iter().position(|r| r.id() == id) {
            Some(index) => Ok(self.rules.remove(index)),
            None => Err(Error::RuleNotFound(id.to_string())),
        }
    }

    pub fn get_rule(&self, id: &str) -> Option<&TierRule> {
        self.rules.iter().find(|r| r.id() == id)
    }

    /// Enable or disable a rule by id
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> Result<()> {
        let rule = self
            .rules
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| Error::RuleNotFound(id.to_string()))?;
        rule.set_enabled(enabled);
        Ok(())
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[TierRule] {
        &self.rules
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Resolve a profile to a tier; first matching rule wins
    pub fn resolve(&self, profile: &DeviceProfile) -> Resolution {
        let resolution = match self.rules.iter().find(|rule| rule.matches(profile)) {
            Some(rule) => Resolution {
                tier: rule.tier(),
                rule: Some(rule.id().to_string()),
            },
            None => Resolution {
                tier: EffectTier::Full,
                rule: None,
            },
        };

        tracing::debug!(
            tier = %resolution.tier,
            rule = resolution.rule.as_deref().unwrap_or("-"),
            "Resolved effect tier"
        );
        resolution
    }

    fn insert_sorted(&mut self, rule: TierRule) {
        // Priority descending, then id ascending for stability
        let index = self
            .rules
            .partition_point(|r| {
                r.priority() > rule.priority()
                    || (r.priority() == rule.priority() && r.id() < rule.id())
            });
        self.rules.insert(index, rule);
    }
}

/// Resolve a profile with the standard rule set
pub fn resolve_tier(profile: &DeviceProfile) -> EffectTier {
    TierResolver::standard().resolve(profile).tier
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(mobile: bool, memory: bool, slow: bool, os: bool) -> DeviceProfile {
        DeviceProfile {
            is_mobile_viewport: mobile,
            has_low_memory: memory,
            has_slow_connection: slow,
            is_low_capability_os: os,
            ..DeviceProfile::default()
        }
    }

    #[test]
    fn test_standard_resolution() {
        assert_eq!(resolve_tier(&profile(false, false, false, false)), EffectTier::Full);
        assert_eq!(resolve_tier(&profile(true, false, false, false)), EffectTier::Reduced);
        assert_eq!(resolve_tier(&profile(false, true, false, false)), EffectTier::Reduced);
        assert_eq!(resolve_tier(&profile(false, false, true, false)), EffectTier::Reduced);
        assert_eq!(resolve_tier(&profile(false, false, false, true)), EffectTier::Minimal);
        // Low-capability OS outranks a constrained desktop
        assert_eq!(resolve_tier(&profile(true, true, true, true)), EffectTier::Minimal);
    }

    #[test]
    fn test_resolution_names_rule() {
        let resolver = TierResolver::standard();
        let resolution = resolver.resolve(&profile(true, false, false, false));
        assert_eq!(resolution.rule.as_deref(), Some("constrained_device"));
    }

    #[test]
    fn test_priority_order() {
        let resolver = TierResolver::standard();
        let ids: Vec<_> = resolver.rules().iter().map(|r| r.id()).collect();
        assert_eq!(ids, ["low_capability_os", "constrained_device", "default"]);
    }

    #[test]
    fn test_add_and_remove() {
        let mut resolver = TierResolver::standard();
        resolver
            .add_rule(
                TierRule::new("low_battery")
                    .with_priority(25)
                    .when(Condition::BatteryLow)
                    .assign(EffectTier::Reduced),
            )
            .unwrap();
        assert_eq!(resolver.rule_count(), 4);
        assert_eq!(resolver.rules()[1].id(), "low_battery");

        let err = resolver.add_rule(TierRule::new("default")).unwrap_err();
        assert!(matches!(err, Error::DuplicateRule(id) if id == "default"));

        resolver.remove_rule("low_battery").unwrap();
        assert!(resolver.remove_rule("low_battery").is_err());
    }

    #[test]
    fn test_disabled_rule_skipped() {
        let mut resolver = TierResolver::standard();
        resolver.set_enabled("low_capability_os", false).unwrap();
        let resolution = resolver.resolve(&profile(false, false, false, true));
        assert_eq!(resolution.tier, EffectTier::Full);
        assert!(resolver.set_enabled("missing", true).is_err());
    }

    #[test]
    fn test_empty_resolver_defaults_to_full() {
        let resolution = TierResolver::new().resolve(&profile(true, true, true, true));
        assert_eq!(resolution.tier, EffectTier::Full);
        assert_eq!(resolution.rule, None);
    }
}
