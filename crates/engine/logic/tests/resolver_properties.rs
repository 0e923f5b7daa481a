//! Properties of tier resolution over the whole profile space

use devices::{DeviceProfile, DeviceSignals, Thresholds};
use logic::{resolve_tier, EffectKind, EffectTier, Governor, Visibility};

/// Every combination of the six profile flags
fn all_profiles() -> impl Iterator<Item = DeviceProfile> {
    (0u8..64).map(|bits| DeviceProfile {
        is_mobile_viewport: bits & 1 != 0,
        has_low_memory: bits & 2 != 0,
        has_slow_connection: bits & 4 != 0,
        is_low_capability_os: bits & 8 != 0,
        prefers_reduced_motion: bits & 16 != 0,
        battery_low: bits & 32 != 0,
    })
}

#[test]
fn test_narrow_viewport_never_full() {
    let thresholds = Thresholds::default();
    for width in [320, 480, 600, 767] {
        let signals = DeviceSignals::desktop().with_viewport(width, 900);
        let profile = DeviceProfile::classify(&signals, &thresholds);
        assert!(resolve_tier(&profile) <= EffectTier::Reduced, "width {width}");
    }

    for profile in all_profiles().filter(|p| p.is_mobile_viewport) {
        assert!(resolve_tier(&profile) <= EffectTier::Reduced, "{profile:?}");
    }
}

#[test]
fn test_breakpoint_is_exclusive() {
    let signals = DeviceSignals::desktop().with_viewport(768, 900);
    let profile = DeviceProfile::classify(&signals, &Thresholds::default());
    assert_eq!(resolve_tier(&profile), EffectTier::Full);
}

#[test]
fn test_low_capability_os_always_minimal() {
    for profile in all_profiles().filter(|p| p.is_low_capability_os) {
        assert_eq!(resolve_tier(&profile), EffectTier::Minimal);
    }
}

#[test]
fn test_emergency_sticks_for_every_profile() {
    let mut governor = Governor::standard();
    governor.evaluate(&DeviceProfile::default());
    governor.trip_emergency();

    for profile in all_profiles() {
        let evaluation = governor.evaluate(&profile);
        assert_eq!(evaluation.tier, EffectTier::Emergency);
        assert_eq!(evaluation.visibility.shown().count(), 0);
    }
}

#[test]
fn test_one_visibility_per_effect() {
    let mut governor = Governor::standard();
    for profile in all_profiles() {
        let evaluation = governor.evaluate(&profile);
        assert_eq!(evaluation.visibility.iter().count(), EffectKind::ALL.len());
        for (kind, visibility) in evaluation.visibility.iter() {
            if let Visibility::Shown { count } = visibility {
                assert_eq!(count, kind.allowance(evaluation.tier));
            }
        }
    }
}

#[test]
fn test_battery_overlay_never_changes_tier() {
    for profile in all_profiles().filter(|p| !p.battery_low) {
        let low = DeviceProfile {
            battery_low: true,
            ..profile
        };
        assert_eq!(resolve_tier(&profile), resolve_tier(&low));
    }
}
