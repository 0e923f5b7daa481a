//! Apply an evaluation to the page as class toggles

use logic::{EffectKind, EffectTier, Evaluation, Overlays, VisibilityMap};

use crate::{selectors, Surface};

pub const EMERGENCY_CLASS: &str = "emergency-mode";
pub const LOW_BATTERY_CLASS: &str = "low-battery-mode";
pub const LOW_CAPABILITY_CLASS: &str = "low-capability-device";
pub const REDUCED_MOTION_CLASS: &str = "reduced-motion";

/// `tier-*` class for a tier
pub fn tier_class(tier: EffectTier) -> String {
    format!("tier-{}", tier.name())
}

/// Toggle decoration and root classes to match the visibility state
///
/// Returns the number of decoration elements touched.
pub fn apply_visibility<S: Surface + ?Sized>(
    visibility: &VisibilityMap,
    tier: EffectTier,
    overlays: Overlays,
    surface: &mut S,
) -> usize {
    let mut touched = 0;
    for kind in EffectKind::ALL {
        let Some(selector) = selectors::decoration(kind) else {
            continue;
        };
        let hidden = !visibility.is_shown(kind);
        for node in surface.query_all(selector) {
            surface.set_class(node, selectors::HIDDEN_CLASS, hidden);
            touched += 1;
        }
    }

    if let Some(root) = surface.root() {
        for t in EffectTier::ALL {
            surface.set_class(root, &tier_class(t), t == tier);
        }
        surface.set_class(root, EMERGENCY_CLASS, tier == EffectTier::Emergency);
        surface.set_class(root, LOW_BATTERY_CLASS, overlays.low_battery);
        surface.set_class(root, LOW_CAPABILITY_CLASS, overlays.low_capability_os);
        surface.set_class(root, REDUCED_MOTION_CLASS, overlays.reduced_motion);
    }

    tracing::trace!(%tier, touched, "Rendered effect visibility");
    touched
}

/// Render a governor evaluation
pub fn apply_evaluation<S: Surface + ?Sized>(evaluation: &Evaluation, surface: &mut S) -> usize {
    apply_visibility(
        &evaluation.visibility,
        evaluation.tier,
        evaluation.overlays,
        surface,
    )
}
