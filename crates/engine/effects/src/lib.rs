//! Effects crate - decorative effects on the landing page
//!
//! - [`Surface`] abstracts the document; [`MemorySurface`] is the in-memory
//!   implementation used by tests and the simulator
//! - [`EffectManager`] instantiates spawned effects and tears them down,
//!   cancelling every pending recycle timer
//! - [`VisibilityGate`] pauses animations while the page is hidden or the
//!   element is scrolled out of view
//! - [`ConfettiField`] simulates the confetti canvas
//! - [`render`] turns an evaluation into class toggles

mod confetti;
mod gate;
mod lifecycle;
pub mod render;
pub mod selectors;
mod spawn;
mod surface;

pub use confetti::{ConfettiCanvas, ConfettiField, ConfettiPiece};
pub use gate::VisibilityGate;
pub use lifecycle::{EffectEvent, EffectHandle, EffectManager};
pub use render::{apply_evaluation, apply_visibility};
pub use spawn::{SpawnParams, BUBBLE_STAGGER};
pub use surface::{IntersectionWatch, MemorySurface, NodeId, Surface};
