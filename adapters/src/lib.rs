//! Core `adapters` crate for abstracting the collaborators behind Healthy You's
//! access-control layer.
//!
//! This crate defines the `AuthBackend` and `RoleStore` traits, which outline the
//! operations the session layer needs from an authentication provider and from
//! role storage, and provides concrete local implementations of both.

pub mod errors;
pub mod local;
pub mod models;
pub mod roles;

use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

pub use errors::AdapterError;
pub use local::LocalAuthBackend;
pub use models::{AuthEvent, Identity, Role};
pub use roles::InMemoryRoleStore;

/// Email/password authentication provider.
///
/// Implementations own the user records; callers only ever see read-only
/// [`Identity`] copies.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Creates an account and signs it in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AdapterError>;

    /// Fails with [`AdapterError::InvalidCredentials`] when the pair is rejected.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AdapterError>;

    async fn sign_out(&self) -> Result<(), AdapterError>;

    /// Returns the identity of a previously persisted session, if any.
    async fn current_session(&self) -> Result<Option<Identity>, AdapterError>;

    /// Change notifications for sign-in and sign-out, whoever triggered them.
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

/// Keyed lookup from identity id to its assigned role. There is no write path
/// through this trait.
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn role_for(&self, user_id: Uuid) -> Result<Option<Role>, AdapterError>;
}
