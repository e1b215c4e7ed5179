//! Defines the HTTP routes for the profile and navigation endpoints.

use std::sync::Arc;

use axum::{routing::get, Router};

use super::handlers::{me, navigation, navigation_events};
use crate::state::AppState;

pub fn user_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(me))
        .route("/api/nav", get(navigation))
        .route("/api/nav/events", get(navigation_events))
}
