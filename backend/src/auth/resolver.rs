//! Role resolution for signed-in identities.

use std::sync::Arc;

use adapters::{Identity, Role, RoleStore};
use tracing::warn;

use super::errors::AuthError;

/// Maps an identity to its role through the role store.
#[derive(Clone)]
pub struct RoleResolver {
    store: Arc<dyn RoleStore>,
}

impl RoleResolver {
    pub fn new(store: Arc<dyn RoleStore>) -> Self {
        Self { store }
    }

    /// An identity without a role record is a plain `user`. A failed lookup
    /// yields no role at all and is only logged.
    pub async fn resolve(&self, identity: &Identity) -> Option<Role> {
        match self.store.role_for(identity.id).await {
            Ok(Some(role)) => Some(role),
            Ok(None) => Some(Role::User),
            Err(err) => {
                let err = AuthError::RoleLookupFailed(err);
                warn!(user_id = %identity.id, error = %err, "Treating identity as having no role");
                None
            }
        }
    }
}
