//! Scroll throttling and the navbar's scrolled state

use std::time::Duration;

use effects::{selectors, Surface};
use system::Instant;

/// Scroll offset past which the navbar switches style
pub const NAVBAR_SCROLL_THRESHOLD_PX: f64 = 100.0;
pub const SCROLLED_CLASS: &str = "scrolled";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThrottleDecision {
    /// Run the handler now
    Run,
    /// Run a trailing call at `at`, replacing any earlier deferred one
    Defer { at: Instant },
}

/// Leading-edge throttle with a trailing call
///
/// The first call runs at once; calls inside the window are deferred to the
/// end of it.
#[derive(Debug, Clone)]
pub struct Throttle {
    window: Duration,
    last_ran: Option<Instant>,
}

impl Throttle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_ran: None,
        }
    }

    pub fn call(&mut self, now: Instant) -> ThrottleDecision {
        match self.last_ran {
            Some(last) if now < last + self.window => ThrottleDecision::Defer {
                at: last + self.window,
            },
            _ => {
                self.last_ran = Some(now);
                ThrottleDecision::Run
            }
        }
    }

    /// A deferred call came due; returns whether to run it
    pub fn fire_deferred(&mut self, now: Instant) -> bool {
        let ready = match self.last_ran {
            Some(last) => now >= last + self.window,
            None => true,
        };
        if ready {
            self.last_ran = Some(now);
        }
        ready
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavbarState {
    scrolled: bool,
}

impl NavbarState {
    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    /// Update from the scroll offset; returns whether the state changed
    pub fn update(&mut self, scroll_y: f64) -> bool {
        let scrolled = scroll_y > NAVBAR_SCROLL_THRESHOLD_PX;
        let changed = scrolled != self.scrolled;
        self.scrolled = scrolled;
        changed
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        if let Some(navbar) = surface.query(selectors::NAVBAR) {
            surface.set_class(navbar, SCROLLED_CLASS, self.scrolled);
        }
    }
}
