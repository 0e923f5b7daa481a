//! App crate - one landing-page session
//!
//! Wires capability detection, tier resolution, effect lifecycles and the
//! page widgets onto a single timer scheduler. Hosts create a
//! [`PageSession`] over a [`effects::Surface`], forward browser events into
//! it and call [`PageSession::tick`] and [`PageSession::on_frame`].
//!
//! ```rust
//! use app::{PageConfig, PageSession};
//! use devices::DeviceSignals;
//! use effects::MemorySurface;
//! use logic::EffectTier;
//! use system::Instant;
//!
//! let config = PageConfig { seed: Some(1), ..PageConfig::default() };
//! let mut session = PageSession::new(MemorySurface::landing_page(), config);
//! let phone = DeviceSignals::desktop().with_viewport(390, 844);
//! session.start(&phone, Instant::ZERO);
//! assert_eq!(session.tier(), EffectTier::Reduced);
//! ```

mod config;
mod session;

pub use config::{ConfigError, PageConfig, TimingConfig};
pub use session::{PageSession, SessionEvent, SessionState, TierCause, TierChange};
