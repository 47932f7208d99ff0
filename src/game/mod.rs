//! Scene drivers. Each owns a [`bevy_ecs::world::World`] and the [`bevy_ecs::schedule::Schedule`]
//! that advances it.

pub mod home;
pub mod runner;

pub use home::{CleanupView, HomeScene, PetView};
pub use runner::RunnerSession;
