//! Testimonial carousel

use effects::{selectors, Surface};
use serde::Serialize;

pub const ACTIVE_CLASS: &str = "active";
pub const DOT_ACTIVE_CLASS: &str = "bg-indigo-500";
pub const DOT_INACTIVE_CLASS: &str = "bg-gray-300";

/// Index of the visible testimonial
///
/// Rotation always wraps with modulo arithmetic, so `next` and `prev` can
/// never select an index outside `0..len`. An empty carousel ignores
/// everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Carousel {
    len: usize,
    current: usize,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self { len, current: 0 }
    }

    /// Carousel sized to the testimonials on the page
    pub fn from_surface<S: Surface + ?Sized>(surface: &S) -> Self {
        Self::new(surface.query_all(selectors::TESTIMONIAL).len())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Visible index, `None` when empty
    pub fn current(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.current)
    }

    /// Select `index`; out-of-range indices are ignored
    pub fn show(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.current = index;
        true
    }

    pub fn next(&mut self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.len;
        Some(self.current)
    }

    pub fn prev(&mut self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        self.current = (self.current + self.len - 1) % self.len;
        Some(self.current)
    }

    /// Toggle item and dot classes to match the current index
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        if self.is_empty() {
            return;
        }
        for (i, item) in surface.query_all(selectors::TESTIMONIAL).into_iter().enumerate() {
            surface.set_class(item, ACTIVE_CLASS, i == self.current);
        }
        for (i, dot) in surface
            .query_all(selectors::TESTIMONIAL_DOT)
            .into_iter()
            .enumerate()
        {
            let active = i == self.current;
            surface.set_class(dot, DOT_ACTIVE_CLASS, active);
            surface.set_class(dot, DOT_INACTIVE_CLASS, !active);
        }
    }
}
