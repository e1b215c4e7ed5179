//! Custom error types specific to the `adapters` crate.
//!
//! These cover credential rejection, input validation, persistence and
//! hashing failures raised by the authentication and role adapters.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("An account already exists for {0}")]
    EmailTaken(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Corrupt auth state: {0}")]
    Corrupt(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
