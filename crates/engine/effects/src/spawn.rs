//! Random parameters for spawned decorations

use std::time::Duration;

use logic::EffectKind;
use rand::Rng;

use crate::{NodeId, Surface};

const HERO_COLORS: [&str; 12] = [
    "#f0e748", "#ece89e", "#d8d9f4", "#c4c6f8", "#a1a4ec", "#7e82e0", "#5b5fd4", "#383cb8",
    "#f0e748", "#f0e748", "#383cb8", "#383cb8",
];

const BUBBLE_VARIANTS: [&str; 3] = ["bubble-yellow", "bubble-blue", "bubble-gradient"];

/// Delay between successive bubbles when a bubble effect starts
pub const BUBBLE_STAGGER: Duration = Duration::from_millis(200);

/// One spawned node's look and timing
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnParams {
    pub kind: EffectKind,
    /// Space-separated classes for the new node
    pub classes: String,
    /// Width and height in pixels
    pub size_px: Option<f32>,
    /// Horizontal position, percent of the container
    pub left_pct: f32,
    /// Vertical position, percent of the container
    pub top_pct: Option<f32>,
    /// Animation duration in seconds
    pub duration_s: f32,
    /// Animation delay in seconds
    pub delay_s: f32,
    /// Horizontal drift in pixels, exposed as `--drift`
    pub drift_px: Option<f32>,
    pub color: Option<&'static str>,
}

impl SpawnParams {
    /// Draw parameters for one node; `None` for kinds that do not spawn
    pub fn generate<R: Rng + ?Sized>(kind: EffectKind, rng: &mut R) -> Option<Self> {
        let params = match kind {
            EffectKind::Particles => Self {
                kind,
                classes: "particle".to_string(),
                size_px: Some(rng.random_range(2.0..4.0)),
                left_pct: rng.random_range(0.0..100.0),
                top_pct: None,
                duration_s: rng.random_range(40.0..60.0),
                delay_s: rng.random_range(0.0..10.0),
                drift_px: Some(rng.random_range(-40.0..40.0)),
                color: None,
            },
            EffectKind::HeroParticles => Self {
                kind,
                classes: "particle".to_string(),
                size_px: Some(rng.random_range(3.0..12.0)),
                left_pct: rng.random_range(0.0..100.0),
                top_pct: None,
                duration_s: rng.random_range(10.0..18.0),
                delay_s: rng.random_range(0.0..15.0),
                drift_px: None,
                color: Some(HERO_COLORS[rng.random_range(0..HERO_COLORS.len())]),
            },
            EffectKind::Bubbles => {
                let variant = BUBBLE_VARIANTS[rng.random_range(0..BUBBLE_VARIANTS.len())];
                Self {
                    kind,
                    classes: format!("bubble {variant}"),
                    size_px: Some(rng.random_range(20.0..120.0)),
                    left_pct: rng.random_range(0.0..100.0),
                    top_pct: None,
                    duration_s: rng.random_range(8.0..20.0),
                    delay_s: rng.random_range(0.0..5.0),
                    drift_px: Some(rng.random_range(-100.0..100.0)),
                    color: None,
                }
            }
            EffectKind::Sparkles => Self {
                kind,
                classes: "sparkle".to_string(),
                size_px: None,
                left_pct: rng.random_range(0.0..100.0),
                top_pct: Some(rng.random_range(0.0..100.0)),
                duration_s: rng.random_range(5.0..9.0),
                delay_s: rng.random_range(0.0..5.0),
                drift_px: None,
                color: None,
            },
            _ => return None,
        };
        Some(params)
    }

    /// Time until the node has finished one pass and is recycled
    pub fn lifetime(&self) -> Duration {
        Duration::from_secs_f32((self.duration_s + self.delay_s).max(0.0))
    }

    /// Write the parameters onto a freshly created node
    pub fn apply<S: Surface + ?Sized>(&self, surface: &mut S, node: NodeId) {
        if let Some(size) = self.size_px {
            let size = format!("{size:.2}px");
            surface.set_style(node, "width", &size);
            surface.set_style(node, "height", &size);
        }
        surface.set_style(node, "left", &format!("{:.2}%", self.left_pct));
        if let Some(top) = self.top_pct {
            surface.set_style(node, "top", &format!("{top:.2}%"));
        }
        if self.kind == EffectKind::Bubbles {
            surface.set_style(node, "bottom", "-150px");
        }
        surface.set_style(node, "animation-duration", &format!("{:.2}s", self.duration_s));
        surface.set_style(node, "animation-delay", &format!("{:.2}s", self.delay_s));
        if let Some(drift) = self.drift_px {
            surface.set_style(node, "--drift", &format!("{drift:.2}px"));
        }
        if let Some(color) = self.color {
            surface.set_style(node, "background", color);
            surface.set_style(node, "box-shadow", &format!("0 0 15px {color}, 0 0 30px {color}"));
        }
    }
}
