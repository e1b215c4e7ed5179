//! Custom error types specific to authentication failures.
//!
//! None of these are fatal: the session store converts restore and role
//! lookup failures into state (signed out, no role) and only hands
//! credential and input problems back to the sign-in form. A navigation
//! denial is a guard decision, not an error.

use adapters::AdapterError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Could not restore the previous session: {0}")]
    SessionRestoreFailed(#[source] AdapterError),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Role lookup failed: {0}")]
    RoleLookupFailed(#[source] AdapterError),

    #[error("{0}")]
    Rejected(String),

    #[error("Authentication backend error: {0}")]
    Backend(#[source] AdapterError),
}

impl From<AdapterError> for AuthError {
    fn from(err: AdapterError) -> Self {
        match err {
            AdapterError::InvalidCredentials => AuthError::InvalidCredentials,
            AdapterError::InvalidInput(msg) => AuthError::Rejected(msg),
            AdapterError::EmailTaken(email) => {
                AuthError::Rejected(format!("An account already exists for {email}"))
            }
            other => AuthError::Backend(other),
        }
    }
}
