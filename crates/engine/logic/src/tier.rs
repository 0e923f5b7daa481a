//! Effect tiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Permitted level of decorative animation richness
///
/// Ordered from strictest to richest, so `Full > Reduced > Minimal >
/// Emergency` and `min` picks the stricter of two tiers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EffectTier {
    /// Watchdog tripped: nothing decorative, for the rest of the session
    Emergency,
    /// Low-capability mobile OS: nothing decorative
    Minimal,
    /// Constrained device: a reduced count of a subset
    Reduced,
    /// Everything at full count
    #[default]
    Full,
}

impl EffectTier {
    /// All tiers, strictest first
    pub const ALL: [EffectTier; 4] = [
        Self::Emergency,
        Self::Minimal,
        Self::Reduced,
        Self::Full,
    ];

    /// Lowercase name, also used for `tier-*` CSS classes
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Emergency => "emergency",
            Self::Minimal => "minimal",
            Self::Reduced => "reduced",
            Self::Full => "full",
        }
    }

    /// The stricter of two tiers
    #[inline]
    pub fn stricter(self, other: EffectTier) -> EffectTier {
        self.min(other)
    }

    /// Whether any decorative effect may exist at this tier
    #[inline]
    pub fn permits_effects(&self) -> bool {
        *self >= Self::Reduced
    }
}

impl fmt::Display for EffectTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tier| tier.name() == normalized)
            .ok_or_else(|| Error::UnknownTier(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(EffectTier::Full > EffectTier::Reduced);
        assert!(EffectTier::Reduced > EffectTier::Minimal);
        assert!(EffectTier::Minimal > EffectTier::Emergency);
        assert_eq!(
            EffectTier::Full.stricter(EffectTier::Minimal),
            EffectTier::Minimal
        );
    }

    #[test]
    fn test_permits_effects() {
        assert!(EffectTier::Full.permits_effects());
        assert!(EffectTier::Reduced.permits_effects());
        assert!(!EffectTier::Minimal.permits_effects());
        assert!(!EffectTier::Emergency.permits_effects());
    }

    #[test]
    fn test_tier_names() {
        for tier in EffectTier::ALL {
            assert_eq!(tier.to_string().parse::<EffectTier>().unwrap(), tier);
        }
        assert!("turbo".parse::<EffectTier>().is_err());
        assert_eq!(serde_json::to_string(&EffectTier::Reduced).unwrap(), "\"reduced\"");
    }
}
