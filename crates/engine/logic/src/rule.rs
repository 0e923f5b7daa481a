//! Tier rule definition

use devices::DeviceProfile;
use serde::{Deserialize, Serialize};

use crate::{Condition, EffectTier};

/// Rule name, unique within a resolver
pub type RuleId = String;

/// A rule that assigns an effect tier when its conditions match
///
/// Rules are evaluated in priority order and the first match wins. Rules
/// with equal priority are ordered by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierRule {
    id: RuleId,
    description: Option<String>,
    /// Every condition must hold
    conditions: Vec<Condition>,
    tier: EffectTier,
    /// Higher runs first
    priority: i32,
    enabled: bool,
}

impl TierRule {
    /// Create a new rule with the given ID, assigning `Full` by default
    pub fn new(id: impl Into<RuleId>) -> Self {
        TierRule {
            id: id.into(),
            description: None,
            conditions: Vec::new(),
            tier: EffectTier::Full,
            priority: 0,
            enabled: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn tier(&self) -> EffectTier {
        self.tier
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Builder: note shown in logs and the CLI
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: require `condition`
    pub fn when(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Builder: require every condition in `conditions`
    pub fn when_all(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.conditions.extend(conditions);
        self
    }

    /// Builder: tier assigned on match
    pub fn assign(mut self, tier: EffectTier) -> Self {
        self.tier = tier;
        self
    }

    /// Builder: evaluation priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Builder: start enabled or disabled
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether this rule fires for `profile`
    ///
    /// Disabled rules never match; a rule with no conditions always does.
    pub fn matches(&self, profile: &DeviceProfile) -> bool {
        self.enabled && self.conditions.iter().all(|c| c.evaluate(profile))
    }
}

impl PartialEq for TierRule {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TierRule {}

impl std::hash::Hash for TierRule {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_builder() {
        let rule = TierRule::new("slow_network")
            .with_description("Slow networks get fewer effects")
            .with_priority(10)
            .when(Condition::SlowConnection)
            .when(Condition::Not(Box::new(Condition::LowCapabilityOs)))
            .assign(EffectTier::Reduced);

        assert_eq!(rule.id(), "slow_network");
        assert_eq!(rule.description(), Some("Slow networks get fewer effects"));
        assert_eq!(rule.priority(), 10);
        assert_eq!(rule.conditions().len(), 2);
        assert_eq!(rule.tier(), EffectTier::Reduced);
        assert!(rule.is_enabled());
    }

    #[test]
    fn test_rule_matching() {
        let mut rule = TierRule::new("mobile")
            .when(Condition::MobileViewport)
            .assign(EffectTier::Reduced);
        let profile = DeviceProfile {
            is_mobile_viewport: true,
            ..DeviceProfile::default()
        };

        assert!(rule.matches(&profile));
        assert!(!rule.matches(&DeviceProfile::default()));

        rule.set_enabled(false);
        assert!(!rule.matches(&profile));
        assert!(TierRule::new("empty").matches(&DeviceProfile::default()));
    }

    #[test]
    fn test_rule_serialization() {
        let rule = TierRule::new("serialize_test")
            .when(Condition::LowMemory)
            .assign(EffectTier::Minimal);

        let json = serde_json::to_string(&rule).unwrap();
        let deserialized: TierRule = serde_json::from_str(&json).unwrap();

        assert_eq!(rule, deserialized);
        assert_eq!(deserialized.tier(), EffectTier::Minimal);
    }
}
