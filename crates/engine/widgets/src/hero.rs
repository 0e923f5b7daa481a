//! Hero content fade on scroll

use effects::{selectors, Surface};

/// Minimum interval between fade updates
pub const HERO_FADE_INTERVAL_MS: u64 = 100;

/// Opacity of the hero content at a scroll offset
///
/// `None` once scrolled past the hero, where the content is left as it was.
pub fn hero_fade_opacity(scrolled: f64, hero_height: f64) -> Option<f64> {
    if hero_height <= 0.0 || scrolled >= hero_height {
        return None;
    }
    Some((1.0 - (scrolled / hero_height) * 1.5).max(0.0))
}

/// Apply the fade to the hero content element
pub fn render_hero_fade<S: Surface + ?Sized>(surface: &mut S, scrolled: f64, hero_height: f64) {
    let Some(opacity) = hero_fade_opacity(scrolled, hero_height) else {
        return;
    };
    if let Some(content) = surface.query(selectors::HERO_CONTENT) {
        surface.set_style(content, "opacity", &format!("{opacity:.3}"));
    }
}
