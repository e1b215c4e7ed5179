//! Handler functions for authentication-related API endpoints.
//!
//! These parse the sign-in/sign-up forms and hand them to the session store.
//! Failures come back as form errors; the session itself always settles.

use std::sync::Arc;

use axum::{extract::State, Json};

use super::models::{Credentials, Session};
use crate::{errors::AppError, state::AppState};

pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Session>, AppError> {
    let session = state
        .session
        .sign_in(&credentials.email, &credentials.password)
        .await?;
    Ok(Json(session))
}

pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Session>, AppError> {
    let session = state
        .session
        .sign_up(&credentials.email, &credentials.password)
        .await?;
    Ok(Json(session))
}

pub async fn sign_out(State(state): State<Arc<AppState>>) -> Json<Session> {
    state.session.sign_out().await;
    Json(state.session.snapshot())
}

pub async fn current_session(State(state): State<Arc<AppState>>) -> Json<Session> {
    Json(state.session.snapshot())
}
