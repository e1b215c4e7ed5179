//! Defines the HTTP routes specifically for authentication.
//!
//! The sign-in view itself (`GET /auth`) is an ordinary page in the route
//! table; these are the form endpoints beneath it.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{current_session, sign_in, sign_out, sign_up};
use crate::state::AppState;

pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/sign-in", post(sign_in))
        .route("/auth/sign-up", post(sign_up))
        .route("/auth/sign-out", post(sign_out))
        .route("/auth/session", get(current_session))
}
