//! Generic data models shared by every adapter implementation.
//!
//! These are the identity and role representations the session layer works
//! with, independent of where users and role assignments are actually stored.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AdapterError;

/// Minimal record of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            created_at: Utc::now(),
        }
    }
}

/// Feature-access tier. Roles are flat: no tier implies another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Guest,
    User,
    Mentor,
    CommunityModerator,
    Premium,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Guest,
        Role::User,
        Role::Mentor,
        Role::CommunityModerator,
        Role::Premium,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::User => "user",
            Role::Mentor => "mentor",
            Role::CommunityModerator => "community_moderator",
            Role::Premium => "premium",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s.trim())
            .ok_or_else(|| AdapterError::UnknownRole(s.to_string()))
    }
}

/// Item of the authentication backend's change-notification stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Identity),
    SignedOut,
}
