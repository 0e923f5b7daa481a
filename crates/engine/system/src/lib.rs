//! System crate - timing and scheduling layer for the landing page runtime
//!
//! Everything on the page runs on one thread, driven by timers and animation
//! frames. This crate gives that model explicit, testable types instead of
//! free-floating browser callbacks.
//!
//! # Modules
//!
//! - [`timer`]: Millisecond timestamps and frame-rate measurement
//! - [`clock`]: Clock abstraction with a real and a manually driven clock
//! - [`scheduler`]: Timer queue with cancellation tokens
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use system::{CancelToken, Clock, ManualClock, Scheduler};
//!
//! let clock = ManualClock::new();
//! let mut scheduler = Scheduler::new();
//! let token = CancelToken::new();
//!
//! scheduler.schedule_after(clock.now(), Duration::from_millis(200), &token, "spawn");
//! clock.advance(Duration::from_millis(250));
//!
//! assert_eq!(scheduler.drain_due(clock.now()), vec!["spawn"]);
//! ```

pub mod clock;
pub mod scheduler;
pub mod timer;

// Re-export commonly used types at crate root
pub use clock::{Clock, ManualClock, SystemClock};
pub use scheduler::{CancelToken, Scheduler, TimerId};
pub use timer::{FpsMeter, FpsSample, Instant};
