//! ECS systems and resources driving the two scenes.
//!
//! The rule types in [`crate::pet`] and [`crate::runner`] double as components; this
//! module wires them into systems that read the frame's delta, clock and user
//! snapshot, and write effects as events.

pub mod components;
pub mod pet;
pub mod runner;

pub use self::components::*;
