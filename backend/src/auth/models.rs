//! Data structures for authentication-related entities.
//!
//! This module defines the session snapshot shared by the route guard and the
//! navigation surface, and the request payloads of the auth endpoints.

use adapters::{Identity, Role};
use serde::{Deserialize, Serialize};

/// Process-local view of who is signed in.
///
/// Fields are private so that `identity absent => role absent` holds for
/// every value that can be observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    identity: Option<Identity>,
    role: Option<Role>,
    loading: bool,
}

impl Session {
    /// Restoration has not completed; identity and role are unknown.
    pub fn pending() -> Self {
        Self {
            identity: None,
            role: None,
            loading: true,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            identity: None,
            role: None,
            loading: false,
        }
    }

    /// `role` is `None` when the role lookup failed.
    pub fn signed_in(identity: Identity, role: Option<Role>) -> Self {
        Self {
            identity: Some(identity),
            role,
            loading: false,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Settled and signed in.
    pub fn is_authenticated(&self) -> bool {
        !self.loading && self.identity.is_some()
    }

    /// Flat equality: `premium` does not satisfy a `user` requirement.
    pub fn has_role(&self, required: Role) -> bool {
        self.role == Some(required)
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}
