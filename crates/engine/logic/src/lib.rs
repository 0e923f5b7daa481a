//! Logic crate - effect tier resolution for the landing page
//!
//! Decides how much decorative animation a device gets. A declarative,
//! priority-ordered rule set maps a [`devices::DeviceProfile`] to an
//! [`EffectTier`]; a frame-rate watchdog can force the strictest tier; and
//! the [`Governor`] folds tier and runtime overlays (low battery, reduced
//! motion) into one visibility decision per effect.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Tier Resolver                         │
//! ├─────────────────────────────────────────────────────────┤
//! │  Rules (priority order, first match wins)                │
//! │  ├── low_capability_os   → minimal                      │
//! │  ├── constrained_device  → reduced                      │
//! │  └── default             → full                         │
//! ├─────────────────────────────────────────────────────────┤
//! │  Frame-rate watchdog                                     │
//! │  └── two windows under 30 fps → emergency (latched)     │
//! ├─────────────────────────────────────────────────────────┤
//! │  Governor                                                │
//! │  ├── effective tier                                     │
//! │  ├── overlays: low battery, reduced motion              │
//! │  └── one Visibility per EffectKind + diff               │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use devices::DeviceProfile;
//! use logic::{resolve_tier, EffectTier};
//!
//! let phone = DeviceProfile {
//!     is_mobile_viewport: true,
//!     ..DeviceProfile::default()
//! };
//! assert_eq!(resolve_tier(&phone), EffectTier::Reduced);
//! ```

mod condition;
mod error;
mod governor;
mod policy;
mod resolver;
mod rule;
mod tier;
mod watchdog;

pub use condition::Condition;
pub use error::{Error, Result};
pub use governor::{
    Evaluation, Governor, HiddenReason, Overlays, Visibility, VisibilityChange, VisibilityMap,
};
pub use policy::{EffectClass, EffectKind};
pub use resolver::{resolve_tier, Resolution, TierResolver};
pub use rule::{RuleId, TierRule};
pub use tier::EffectTier;
pub use watchdog::{FrameRateWatchdog, WatchdogConfig, WatchdogEvent};
