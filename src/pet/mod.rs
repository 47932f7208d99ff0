//! Rules of the pet lifecycle: hatching, needs decay, wandering and waste.
//!
//! These are plain state machines advanced by the home scene systems; none of
//! them touch the user document directly, they only produce patches.

pub mod degradation;
pub mod hatching;
pub mod movement;
pub mod waste;

pub use degradation::{decay_needs, DecayRates, Degradation, DegradationStep};
pub use hatching::{HatchAnimation, HatchGuard};
pub use movement::{facing_for, Wander, WanderStep};
pub use waste::{CleanupPhase, WasteCleanup, WasteTimer};
