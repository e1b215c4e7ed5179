//! Handler functions for account and navigation endpoints.
//!
//! Navigation is rendered from the live session on every request, and the
//! event stream re-renders it on every session change.

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures_util::{stream, Stream};
use serde::{Deserialize, Serialize};

use crate::{
    errors::AppError,
    services::navigation::{self, NavigationView},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct Profile {
    pub email: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct NavQuery {
    pub path: Option<String>,
}

pub async fn me(State(state): State<Arc<AppState>>) -> Result<Json<Profile>, AppError> {
    let session = state.session.snapshot();
    let identity = session.identity().ok_or(AppError::Unauthenticated)?;
    Ok(Json(Profile {
        email: identity.email.clone(),
        role: session
            .role()
            .map_or_else(|| "none".to_string(), |r| r.to_string()),
    }))
}

pub async fn navigation(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NavQuery>,
) -> Json<NavigationView> {
    let session = state.session.snapshot();
    Json(navigation::render(
        &state.routes,
        &session,
        state.config.nav_policy,
        query.path.as_deref(),
    ))
}

pub async fn navigation_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let updates = state.session.subscribe();

    let events = stream::unfold((state, updates, true), |(state, mut updates, first)| async move {
        if !first {
            updates.changed().await.ok()?;
        }
        let session = updates.borrow_and_update().clone();
        let view = navigation::render(&state.routes, &session, state.config.nav_policy, None);
        let event = Event::default()
            .event("navigation")
            .json_data(&view)
            .unwrap_or_else(|_| Event::default().event("navigation").comment("unavailable"));
        Some((Ok(event), (state, updates, false)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
