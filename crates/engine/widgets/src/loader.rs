//! Page loader overlay

use effects::{selectors, Surface};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderPhase {
    #[default]
    Visible,
    Fading,
    Hidden,
}

/// Loader that fades out and is then removed from layout
#[derive(Debug, Clone, Default)]
pub struct Loader {
    phase: LoaderPhase,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> LoaderPhase {
        self.phase
    }

    pub fn begin_fade(&mut self) -> bool {
        if self.phase != LoaderPhase::Visible {
            return false;
        }
        self.phase = LoaderPhase::Fading;
        true
    }

    pub fn finish(&mut self) -> bool {
        if self.phase != LoaderPhase::Fading {
            return false;
        }
        self.phase = LoaderPhase::Hidden;
        true
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        let Some(loader) = surface.query(selectors::LOADER) else {
            return;
        };
        match self.phase {
            LoaderPhase::Visible => {}
            LoaderPhase::Fading => {
                surface.set_style(loader, "opacity", "0");
                surface.set_style(loader, "visibility", "hidden");
            }
            LoaderPhase::Hidden => surface.set_style(loader, "display", "none"),
        }
    }
}
