//! Virtual pet client core: the pet lifecycle engine and the endless runner minigame.

pub mod app;
pub mod clock;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod gateway;
pub mod logging;
pub mod pet;
pub mod runner;
pub mod sprite;
pub mod store;
pub mod systems;
