//! The account document shared with the server, and partial updates to it.

pub mod pet;
pub mod user;

pub use pet::{EvolutionId, Needs, Pet, PetId, PetPatch};
pub use user::{AuthResponse, Credentials, HomeObject, HomeObjectId, InventoryItem, UserData};
