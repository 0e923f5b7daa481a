//! Clock abstraction
//!
//! Session code never reads the time itself; it is handed a [`Clock`] or an
//! [`Instant`]. Production uses [`SystemClock`], tests and the simulator use
//! [`ManualClock`] and move time forward explicitly.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::Instant;

/// Source of the current time
pub trait Clock {
    /// Returns the current instant
    fn now(&self) -> Instant;
}

/// Real clock
///
/// On native platforms it measures from its own creation using
/// `std::time::Instant`. On web/WASM it uses `performance.now()`, which is
/// already relative to page navigation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    origin: std::time::Instant,
}

impl SystemClock {
    /// Create a clock whose origin is now (native) or page start (web)
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            origin: std::time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        #[cfg(not(target_arch = "wasm32"))]
        {
            Instant::from_millis(self.origin.elapsed().as_secs_f64() * 1000.0)
        }
        #[cfg(target_arch = "wasm32")]
        {
            Instant::from_millis(performance_now())
        }
    }
}

/// Manually driven clock
///
/// Clones share the same time, so a test can hand one clone to the code
/// under test and advance another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Rc<Cell<f64>>,
}

impl ManualClock {
    /// Create a clock at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock at the given instant
    pub fn starting_at(start: Instant) -> Self {
        let clock = Self::new();
        clock.set(start);
        clock
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        self.millis.set(self.millis.get() + by.as_secs_f64() * 1000.0);
    }

    /// Move time forward by fractional milliseconds
    pub fn advance_millis(&self, millis: f64) {
        self.millis.set(self.millis.get() + millis.max(0.0));
    }

    /// Jump to an instant
    pub fn set(&self, at: Instant) {
        self.millis.set(at.as_millis());
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        Instant::from_millis(self.millis.get())
    }
}

/// Get performance.now() on web platforms
#[cfg(target_arch = "wasm32")]
fn performance_now() -> f64 {
    js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("performance"))
        .ok()
        .and_then(|perf| {
            let now = js_sys::Reflect::get(&perf, &JsValue::from_str("now")).ok()?;
            if now.is_function() {
                let func: js_sys::Function = now.into();
                func.call0(&perf).ok()
            } else {
                None
            }
        })
        .and_then(|val| val.as_f64())
        .unwrap_or(0.0)
}
