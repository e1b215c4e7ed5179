//! Middleware for protecting views and enforcing role requirements.
//!
//! [`evaluate`] is the route guard proper: a pure function of the current
//! session and a view's requirement. [`guard_route`] applies it to every
//! request whose path belongs to a view in the route table.

use std::sync::Arc;

use adapters::Role;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use tracing::debug;

use super::models::Session;
use crate::{
    services::route_table::{RouteRequirement, SIGN_IN_PATH},
    state::AppState,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session restoration or an auth operation is still running.
    Pending,
    DeniedUnauth,
    DeniedRole {
        required: Role,
        current: Option<Role>,
    },
    Allowed,
}

pub fn evaluate(session: &Session, requirement: &RouteRequirement) -> GuardDecision {
    if requirement.is_public() {
        return GuardDecision::Allowed;
    }
    if session.is_loading() {
        return GuardDecision::Pending;
    }
    if requirement.requires_auth && session.identity().is_none() {
        return GuardDecision::DeniedUnauth;
    }
    if let Some(required) = requirement.required_role {
        if !session.has_role(required) {
            return GuardDecision::DeniedRole {
                required,
                current: session.role(),
            };
        }
    }
    GuardDecision::Allowed
}

#[derive(Debug, Serialize)]
struct AccessDenied {
    view: &'static str,
    title: &'static str,
    message: String,
    required_role: Role,
    current_role: String,
}

impl AccessDenied {
    fn new(required: Role, current: Option<Role>) -> Self {
        Self {
            view: "access_denied",
            title: "Access Denied",
            message: format!("You need the \"{required}\" role to access this feature."),
            required_role: required,
            current_role: current.map_or_else(|| "none".to_string(), |r| r.to_string()),
        }
    }
}

pub async fn guard_route(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let Some(requirement) = state.routes.requirement_for(&path) else {
        return next.run(request).await;
    };

    match evaluate(&state.session.snapshot(), requirement) {
        GuardDecision::Allowed => next.run(request).await,
        GuardDecision::Pending => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::RETRY_AFTER, "1")],
            Json(serde_json::json!({ "view": "loading" })),
        )
            .into_response(),
        GuardDecision::DeniedUnauth => {
            debug!(%path, "Not signed in, redirecting to sign-in");
            Redirect::to(SIGN_IN_PATH).into_response()
        }
        GuardDecision::DeniedRole { required, current } => {
            debug!(%path, %required, current = ?current, "Role requirement not met");
            (StatusCode::FORBIDDEN, Json(AccessDenied::new(required, current))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapters::Identity;

    fn every_session() -> Vec<Session> {
        let mut sessions = vec![Session::pending(), Session::signed_out()];
        sessions.push(Session::signed_in(Identity::new("none@example.com"), None));
        for role in Role::ALL {
            sessions.push(Session::signed_in(Identity::new("ada@example.com"), Some(role)));
        }
        sessions
    }

    fn every_requirement() -> Vec<RouteRequirement> {
        let mut requirements = vec![
            RouteRequirement::public("/open", "Open"),
            RouteRequirement::authenticated("/members", "Members"),
        ];
        for role in Role::ALL {
            requirements.push(RouteRequirement::with_role("/tier", "Tier", role));
            requirements.push(RouteRequirement {
                requires_auth: false,
                ..RouteRequirement::with_role("/tier-open", "Tier", role)
            });
        }
        requirements
    }

    #[test]
    fn public_views_are_always_allowed() {
        let open = RouteRequirement::public("/", "Home");
        for session in every_session() {
            assert_eq!(evaluate(&session, &open), GuardDecision::Allowed);
        }
    }

    #[test]
    fn loading_is_pending_for_anything_guarded() {
        let loading = Session::pending();
        for requirement in every_requirement().iter().filter(|r| !r.is_public()) {
            assert_eq!(evaluate(&loading, requirement), GuardDecision::Pending);
        }
    }

    #[test]
    fn signed_out_visitors_are_sent_to_sign_in() {
        let members = RouteRequirement::authenticated("/bmi", "BMI");
        assert_eq!(
            evaluate(&Session::signed_out(), &members),
            GuardDecision::DeniedUnauth
        );
    }

    #[test]
    fn under_privileged_identity_is_denied_in_place() {
        let session = Session::signed_in(Identity::new("ada@example.com"), Some(Role::User));
        let mentor_only = RouteRequirement::with_role("/coaching", "Coaching", Role::Mentor);
        assert_eq!(
            evaluate(&session, &mentor_only),
            GuardDecision::DeniedRole {
                required: Role::Mentor,
                current: Some(Role::User),
            }
        );
    }

    #[test]
    fn roles_do_not_rank() {
        let premium = Session::signed_in(Identity::new("ada@example.com"), Some(Role::Premium));
        let user_only = RouteRequirement::with_role("/mentor", "Mentor", Role::User);
        assert!(matches!(
            evaluate(&premium, &user_only),
            GuardDecision::DeniedRole { .. }
        ));
    }

    #[test]
    fn missing_role_reports_none() {
        let denied = AccessDenied::new(Role::User, None);
        assert_eq!(denied.current_role, "none");
        assert_eq!(denied.message, "You need the \"user\" role to access this feature.");
    }

    #[test]
    fn matching_role_is_allowed() {
        let session = Session::signed_in(Identity::new("ada@example.com"), Some(Role::User));
        let table = crate::services::route_table::RouteTable::standard();
        for requirement in table.iter() {
            assert_eq!(evaluate(&session, requirement), GuardDecision::Allowed);
        }
    }
}
