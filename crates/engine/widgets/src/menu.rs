//! Mobile navigation menu

use effects::{selectors, Surface};

pub const OPEN_CLASS: &str = "active";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MobileMenu {
    open: bool,
}

impl MobileMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Hamburger button pressed
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// A menu link was followed
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        let (Some(button), Some(menu)) = (
            surface.query(selectors::MENU_BUTTON),
            surface.query(selectors::MENU),
        ) else {
            return;
        };
        surface.set_class(menu, OPEN_CLASS, self.open);
        surface.set_attribute(button, "aria-expanded", if self.open { "true" } else { "false" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use effects::MemorySurface;

    #[test]
    fn test_toggle_and_close() {
        let mut surface = MemorySurface::landing_page();
        let menu_node = surface.query(selectors::MENU).unwrap();
        let button = surface.query(selectors::MENU_BUTTON).unwrap();
        let mut menu = MobileMenu::default();

        assert!(menu.toggle());
        menu.render(&mut surface);
        assert!(surface.has_class(menu_node, OPEN_CLASS));
        assert_eq!(surface.attribute(button, "aria-expanded").as_deref(), Some("true"));

        menu.close();
        menu.render(&mut surface);
        assert!(!surface.has_class(menu_node, OPEN_CLASS));
        assert!(!menu.is_open());
    }
}
