//! Centralized error types for the simulation core.
//!
//! None of these are fatal to a session: callers handle them where they are
//! detected and fall back to a safe screen or stale data.

use crate::data::PetId;

/// Main error type for the simulation core.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Pet {0} does not exist in the current user document")]
    MissingPet(PetId),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Errors raised while reconciling with the persistence gateway.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("No user document is loaded")]
    NoUserData,

    #[error("Request failed: {0}")]
    RequestFailed(String),
}

/// Login and registration failures, mapped from the server's status codes.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Incorrect password")]
    InvalidPassword,

    #[error("User not found")]
    UserNotFound,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Unexpected response status {0}")]
    Unexpected(u16),
}

impl AuthError {
    /// Maps a non-success HTTP status code from `/login` or `/register`.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => AuthError::InvalidPassword,
            404 => AuthError::UserNotFound,
            400 => AuthError::UsernameTaken,
            other => AuthError::Unexpected(other),
        }
    }
}

/// Result type for simulation operations.
pub type GameResult<T> = Result<T, GameError>;
