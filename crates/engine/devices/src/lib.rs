//! Device capability detection
//!
//! This crate turns raw environment signals (viewport, memory hint, network
//! hint, user agent, battery, motion preference) into a [`DeviceProfile`]
//! that the tier logic consumes. It has no browser dependency: the browser
//! crate implements [`SignalSource`], tests and the simulator use
//! [`StaticSource`].
//!
//! # Modules
//!
//! - [`signals`]: Raw signal snapshot
//! - [`connection`]: Network effective connection type
//! - [`battery`]: Battery status
//! - [`source`]: Signal source trait and in-memory implementations
//! - [`profile`]: Thresholds and the classifier
//!
//! Every browser API behind these signals is optional. An absent API maps to
//! the value that does *not* mark the device as low-power.

pub mod battery;
pub mod connection;
pub mod profile;
pub mod signals;
pub mod source;

mod error;

// Re-export commonly used types at crate root
pub use battery::BatteryStatus;
pub use connection::EffectiveConnectionType;
pub use error::{Error, Result};
pub use profile::{classify, matches_signature, DeviceProfile, Thresholds};
pub use signals::{DeviceSignals, Viewport};
pub use source::{NullSource, SignalSource, StaticSource};
