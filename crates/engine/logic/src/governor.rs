//! Consolidated effect-visibility evaluation
//!
//! The governor is the one place that decides whether an effect runs. Each
//! evaluation combines, in order:
//!
//! 1. the base tier from the rule set
//! 2. the latched emergency tier, once the watchdog has tripped
//! 3. the low-battery overlay
//! 4. the reduced-motion overlay
//!
//! and produces exactly one [`Visibility`] per [`EffectKind`], together with
//! the changes since the previous evaluation.

use std::collections::BTreeMap;

use devices::DeviceProfile;
use serde::Serialize;

use crate::{EffectKind, EffectTier, Resolution, RuleId, TierResolver};

/// Flags layered on top of the tier without changing it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Overlays {
    pub low_battery: bool,
    pub reduced_motion: bool,
    pub low_capability_os: bool,
}

impl Overlays {
    pub fn from_profile(profile: &DeviceProfile) -> Self {
        Self {
            low_battery: profile.battery_low,
            reduced_motion: profile.prefers_reduced_motion,
            low_capability_os: profile.is_low_capability_os,
        }
    }

    /// Carousel auto-rotation is off under reduced motion
    pub fn carousel_autoplay(&self) -> bool {
        !self.reduced_motion
    }
}

/// Why an effect is hidden; the first applicable reason wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenReason {
    Tier,
    LowBattery,
    ReducedMotion,
}

/// Authoritative state of one effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Shown { count: u32 },
    Hidden(HiddenReason),
}

impl Visibility {
    #[inline]
    pub fn is_shown(&self) -> bool {
        matches!(self, Visibility::Shown { .. })
    }

    /// Permitted count, 0 when hidden
    #[inline]
    pub fn count(&self) -> u32 {
        match self {
            Visibility::Shown { count } => *count,
            Visibility::Hidden(_) => 0,
        }
    }
}

/// One visibility per effect kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VisibilityMap(BTreeMap<EffectKind, Visibility>);

impl VisibilityMap {
    /// Compute visibility for every effect kind
    pub fn compute(tier: EffectTier, overlays: Overlays) -> Self {
        let map = EffectKind::ALL
            .into_iter()
            .map(|kind| (kind, Self::decide(kind, tier, overlays)))
            .collect();
        Self(map)
    }

    /// Every effect hidden by tier; the state before the first evaluation
    pub fn empty() -> Self {
        Self::compute(EffectTier::Emergency, Overlays::default())
    }

    fn decide(kind: EffectKind, tier: EffectTier, overlays: Overlays) -> Visibility {
        let count = kind.allowance(tier);
        if count == 0 {
            Visibility::Hidden(HiddenReason::Tier)
        } else if overlays.low_battery && kind.hidden_on_low_battery() {
            Visibility::Hidden(HiddenReason::LowBattery)
        } else if overlays.reduced_motion && kind.hidden_on_reduced_motion() {
            Visibility::Hidden(HiddenReason::ReducedMotion)
        } else {
            Visibility::Shown { count }
        }
    }

    pub fn get(&self, kind: EffectKind) -> Visibility {
        self.0
            .get(&kind)
            .copied()
            .unwrap_or(Visibility::Hidden(HiddenReason::Tier))
    }

    #[inline]
    pub fn is_shown(&self, kind: EffectKind) -> bool {
        self.get(kind).is_shown()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EffectKind, Visibility)> + '_ {
        self.0.iter().map(|(kind, visibility)| (*kind, *visibility))
    }

    /// Kinds currently shown
    pub fn shown(&self) -> impl Iterator<Item = EffectKind> + '_ {
        self.iter().filter(|(_, v)| v.is_shown()).map(|(kind, _)| kind)
    }

    /// Changes needed to go from `self` to `next`
    pub fn diff(&self, next: &VisibilityMap) -> Vec<VisibilityChange> {
        next.iter()
            .filter_map(|(kind, after)| {
                let before = self.get(kind);
                (before != after).then_some(VisibilityChange {
                    kind,
                    before,
                    after,
                })
            })
            .collect()
    }
}

/// A single effect whose visibility changed between evaluations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisibilityChange {
    pub kind: EffectKind,
    pub before: Visibility,
    pub after: Visibility,
}

impl VisibilityChange {
    /// The effect was running and must be torn down
    pub fn is_teardown(&self) -> bool {
        self.before.is_shown() && !self.after.is_shown()
    }

    /// The effect was not running and must be instantiated
    pub fn is_instantiate(&self) -> bool {
        !self.before.is_shown() && self.after.is_shown()
    }

    /// The effect keeps running at a different count
    pub fn is_resize(&self) -> bool {
        self.before.is_shown() && self.after.is_shown()
    }
}

/// Result of one governor evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    /// Effective tier after the emergency latch
    pub tier: EffectTier,
    /// Tier chosen by the rules alone
    pub base_tier: EffectTier,
    /// Rule that chose the base tier
    pub rule: Option<RuleId>,
    pub overlays: Overlays,
    pub visibility: VisibilityMap,
    /// Changes against the previous evaluation
    pub changes: Vec<VisibilityChange>,
    /// Whether the effective tier differs from the previous evaluation
    pub tier_changed: bool,
}

/// Owns the rule set, the emergency latch and the last evaluation
#[derive(Debug, Clone)]
pub struct Governor {
    resolver: TierResolver,
    profile: DeviceProfile,
    emergency: bool,
    last: Option<Evaluation>,
}

impl Governor {
    pub fn new(resolver: TierResolver) -> Self {
        Self {
            resolver,
            profile: DeviceProfile::default(),
            emergency: false,
            last: None,
        }
    }

    /// Governor using [`TierResolver::standard`]
    pub fn standard() -> Self {
        Self::new(TierResolver::standard())
    }

    pub fn resolver(&self) -> &TierResolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut TierResolver {
        &mut self.resolver
    }

    /// Evaluate a fresh profile
    pub fn evaluate(&mut self, profile: &DeviceProfile) -> Evaluation {
        self.profile = *profile;
        self.reevaluate()
    }

    /// Latch the emergency tier and re-evaluate
    ///
    /// Returns `None` when already latched.
    pub fn trip_emergency(&mut self) -> Option<Evaluation> {
        if self.emergency {
            return None;
        }
        self.emergency = true;
        tracing::warn!("Emergency tier latched for the rest of the session");
        Some(self.reevaluate())
    }

    /// Re-run the evaluation with the last profile
    pub fn reevaluate(&mut self) -> Evaluation {
        let Resolution { tier: base_tier, rule } = self.resolver.resolve(&self.profile);
        let tier = if self.emergency {
            EffectTier::Emergency
        } else {
            base_tier
        };
        let overlays = Overlays::from_profile(&self.profile);
        let visibility = VisibilityMap::compute(tier, overlays);

        let (changes, tier_changed) = match &self.last {
            Some(previous) => (previous.visibility.diff(&visibility), previous.tier != tier),
            None => (VisibilityMap::empty().diff(&visibility), true),
        };

        if tier_changed {
            tracing::info!(%tier, %base_tier, "Effect tier changed");
        }
        if let Some(previous) = &self.last {
            if previous.overlays.low_battery != overlays.low_battery {
                tracing::info!(low_battery = overlays.low_battery, "Battery overlay changed");
            }
        }

        let evaluation = Evaluation {
            tier,
            base_tier,
            rule,
            overlays,
            visibility,
            changes,
            tier_changed,
        };
        self.last = Some(evaluation.clone());
        evaluation
    }

    #[inline]
    pub fn is_emergency(&self) -> bool {
        self.emergency
    }

    /// Effective tier of the last evaluation, `Full` before the first
    pub fn tier(&self) -> EffectTier {
        self.last.as_ref().map_or(EffectTier::Full, |e| e.tier)
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn last(&self) -> Option<&Evaluation> {
        self.last.as_ref()
    }
}

impl Default for Governor {
    fn default() -> Self {
        Self::standard()
    }
}
