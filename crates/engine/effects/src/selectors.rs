//! Element selectors the page markup provides

use logic::EffectKind;

pub const HERO: &str = "#hero-section";
pub const HERO_CONTENT: &str = ".hero-content";
pub const LOADER: &str = "#loader";
pub const NAVBAR: &str = "#main-navbar";
pub const MENU_BUTTON: &str = "#mobile-menu-btn";
pub const MENU: &str = "#mobile-menu";
pub const MENU_LINK: &str = ".mobile-link";
pub const TESTIMONIAL: &str = ".testimonial";
pub const TESTIMONIAL_DOT: &str = ".testimonial-dot";
pub const PREV_TESTIMONIAL: &str = "#prev-testimonial";
pub const NEXT_TESTIMONIAL: &str = "#next-testimonial";
pub const AVATAR_TILT: &str = ".avatar-tilt";
pub const CONTACT_FORM: &str = "#contact-form";
pub const SUBMIT_BUTTON: &str = "#submit-btn";
pub const CONFETTI_CANVAS: &str = "#confetti-canvas";
pub const COUNTER: &str = ".counter";

/// Class that hides a decoration without removing it
pub const HIDDEN_CLASS: &str = "fx-hidden";

/// Container new nodes are appended to, for spawned effects
pub const fn container(kind: EffectKind) -> Option<&'static str> {
    match kind {
        EffectKind::Particles => Some("#particles"),
        EffectKind::HeroParticles => Some("#particles-container"),
        EffectKind::Bubbles => Some(".bubbles-container"),
        EffectKind::Sparkles => Some("#sparkles"),
        _ => None,
    }
}

/// Elements toggled by the render step
pub const fn decoration(kind: EffectKind) -> Option<&'static str> {
    match kind {
        EffectKind::Blobs => Some(".blob-shape"),
        EffectKind::Orbs => Some(".orbs-container, .orb"),
        EffectKind::LightRays => Some(".light-rays, .light-ray"),
        EffectKind::Rings => Some(".rings-container, .animated-ring"),
        EffectKind::FloatingShapes => Some(".floating-shape, .floating-dot"),
        EffectKind::Sparkles => Some("#sparkles"),
        EffectKind::Confetti => Some(CONFETTI_CANVAS),
        _ => None,
    }
}

/// Regions whose animations the visibility gate pauses
pub const ANIMATED_REGIONS: &str = "#hero-section, .bubbles-container";

/// Decorations paused while scrolled out of the viewport
pub const OFFSCREEN_PAUSED: &str = ".blob-shape, .particle, .sparkle, .floating-shape, .orb, \
     .animated-ring, .floating-dot, .light-ray";

/// Whether a node carries one of the [`OFFSCREEN_PAUSED`] classes
pub fn pauses_offscreen<S: crate::Surface + ?Sized>(surface: &S, node: crate::NodeId) -> bool {
    OFFSCREEN_PAUSED
        .split(',')
        .filter_map(|part| part.trim().strip_prefix('.'))
        .any(|class| surface.has_class(node, class))
}

pub const SCROLL_INDICATOR: &str = "#scroll-indicator";
/// Section the scroll indicator jumps to
pub const SKILLS: &str = "#skills";
pub const TIMELINE_STEP: &str = ".timeline-step";
pub const TIMELINE_PATH: &str = ".timeline-path";
pub const TOUCH_RIPPLE_CLASS: &str = "touch-ripple";
