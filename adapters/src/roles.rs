//! In-memory role storage.
//!
//! Role assignment happens outside the access-control layer; this store is
//! seeded once at start-up (from a JSON file mapping user ids to role names)
//! and then only read.

use std::{collections::HashMap, path::Path};

use async_trait::async_trait;
use log::info;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::{errors::AdapterError, models::Role, RoleStore};

#[derive(Debug, Default)]
pub struct InMemoryRoleStore {
    roles: RwLock<HashMap<Uuid, Role>>,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `{ "<user id>": "<role>" }`.
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AdapterError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let raw: HashMap<Uuid, String> = serde_json::from_slice(&bytes)?;

        let store = Self::new();
        for (user_id, role) in raw {
            store.assign(user_id, role.parse()?);
        }
        info!(
            "Loaded {} role assignments from {}",
            store.roles.read().len(),
            path.display()
        );
        Ok(store)
    }

    pub fn assign(&self, user_id: Uuid, role: Role) {
        self.roles.write().insert(user_id, role);
    }
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn role_for(&self, user_id: Uuid) -> Result<Option<Role>, AdapterError> {
        Ok(self.roles.read().get(&user_id).copied())
    }
}
