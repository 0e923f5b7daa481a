//! Widgets crate - interactive parts of the landing page
//!
//! Each widget is a small state machine plus a `render` onto an
//! [`effects::Surface`]. None of them own timers: the page session
//! schedules whatever they need and feeds the results back in.

mod carousel;
mod counter;
mod form;
mod hero;
mod loader;
mod menu;
mod navbar;
mod tilt;

pub use carousel::{Carousel, ACTIVE_CLASS, DOT_ACTIVE_CLASS, DOT_INACTIVE_CLASS};
pub use counter::{format_final, CounterAnimation, COUNTER_DURATION_MS, COUNTER_STEP_MS};
pub use form::{ContactForm, FormState, FormTimer, IDLE_LABEL, SENDING_LABEL, SENT_LABEL};
pub use hero::{hero_fade_opacity, render_hero_fade, HERO_FADE_INTERVAL_MS};
pub use loader::{Loader, LoaderPhase};
pub use menu::MobileMenu;
pub use navbar::{NavbarState, Throttle, ThrottleDecision, NAVBAR_SCROLL_THRESHOLD_PX};
pub use tilt::{tilt_for, Rect, Tilt, MAX_TILT_DEG, TILT_RADIUS_PX};
