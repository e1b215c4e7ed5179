//! Shared application state handed to every handler and middleware.
//!
//! Holds the one session store of the process alongside the route table and
//! the record store.

use std::sync::Arc;

use adapters::{AuthBackend, InMemoryRoleStore, LocalAuthBackend, RoleStore};
use anyhow::Context;
use tracing::info;

use crate::{
    auth::{RoleResolver, SessionStore},
    config::Config,
    database::JsonStore,
    services::route_table::RouteTable,
};

pub struct AppState {
    pub config: Config,
    pub session: SessionStore,
    pub routes: RouteTable,
    pub store: JsonStore,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Arc<Self>> {
        let backend = LocalAuthBackend::open(config.auth_state_path())
            .await
            .context("Failed to open auth state")?;

        let roles = match &config.roles_file {
            Some(path) => InMemoryRoleStore::from_json_file(path)
                .await
                .with_context(|| format!("Failed to load roles from {}", path.display()))?,
            None => {
                info!("No roles file configured, every identity resolves to \"user\"");
                InMemoryRoleStore::new()
            }
        };

        let store = JsonStore::open(config.records_dir()).await?;

        Ok(Self::from_parts(
            config,
            Arc::new(backend),
            Arc::new(roles),
            store,
        ))
    }

    pub fn from_parts(
        config: Config,
        backend: Arc<dyn AuthBackend>,
        roles: Arc<dyn RoleStore>,
        store: JsonStore,
    ) -> Arc<Self> {
        let session = SessionStore::new(backend, RoleResolver::new(roles));

        Arc::new(Self {
            config,
            session,
            routes: RouteTable::standard(),
            store,
        })
    }
}
