//! Per-effect allowances for each tier

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{EffectTier, Error, Result};

/// How an effect exists on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectClass {
    /// Nodes created at runtime and recycled on a timer
    Spawned,
    /// Decoration present in the markup, shown or hidden by class
    Static,
    /// Scroll or pointer behavior with no nodes of its own
    Behavior,
    /// Pieces drawn on a canvas
    Canvas,
}

/// Every decorative effect on the landing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Particles,
    HeroParticles,
    Bubbles,
    Sparkles,
    Blobs,
    Orbs,
    LightRays,
    Rings,
    FloatingShapes,
    Parallax,
    Confetti,
}

impl EffectKind {
    pub const ALL: [EffectKind; 11] = [
        Self::Particles,
        Self::HeroParticles,
        Self::Bubbles,
        Self::Sparkles,
        Self::Blobs,
        Self::Orbs,
        Self::LightRays,
        Self::Rings,
        Self::FloatingShapes,
        Self::Parallax,
        Self::Confetti,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Particles => "particles",
            Self::HeroParticles => "hero_particles",
            Self::Bubbles => "bubbles",
            Self::Sparkles => "sparkles",
            Self::Blobs => "blobs",
            Self::Orbs => "orbs",
            Self::LightRays => "light_rays",
            Self::Rings => "rings",
            Self::FloatingShapes => "floating_shapes",
            Self::Parallax => "parallax",
            Self::Confetti => "confetti",
        }
    }

    pub const fn class(&self) -> EffectClass {
        match self {
            Self::Particles | Self::HeroParticles | Self::Bubbles | Self::Sparkles => {
                EffectClass::Spawned
            }
            Self::Blobs | Self::Orbs | Self::LightRays | Self::Rings | Self::FloatingShapes => {
                EffectClass::Static
            }
            Self::Parallax => EffectClass::Behavior,
            Self::Confetti => EffectClass::Canvas,
        }
    }

    /// How many of this effect the tier allows
    ///
    /// Spawned and canvas effects return a piece count; static decorations
    /// and behaviors return 1 for on and 0 for off.
    pub const fn allowance(&self, tier: EffectTier) -> u32 {
        match tier {
            EffectTier::Emergency | EffectTier::Minimal => 0,
            EffectTier::Reduced => match self {
                Self::Particles => 2,
                Self::HeroParticles => 6,
                Self::Bubbles => 2,
                Self::Sparkles => 0,
                Self::Blobs | Self::FloatingShapes => 1,
                Self::Orbs | Self::LightRays | Self::Rings | Self::Parallax => 0,
                Self::Confetti => 25,
            },
            EffectTier::Full => match self {
                Self::Particles => 5,
                Self::HeroParticles => 15,
                Self::Bubbles => 5,
                Self::Sparkles => 3,
                Self::Confetti => 50,
                Self::Blobs
                | Self::Orbs
                | Self::LightRays
                | Self::Rings
                | Self::FloatingShapes
                | Self::Parallax => 1,
            },
        }
    }

    /// Hidden while the battery is low and discharging
    pub const fn hidden_on_low_battery(&self) -> bool {
        matches!(self, Self::Sparkles | Self::Orbs | Self::LightRays)
    }

    /// Hidden when the user prefers reduced motion
    pub const fn hidden_on_reduced_motion(&self) -> bool {
        matches!(self, Self::Confetti)
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| Error::UnknownEffect(s.to_string()))
    }
}
