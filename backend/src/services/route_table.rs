//! Static access policy for every navigable view.
//!
//! Each view declares its requirement once, here; the route guard, the
//! navigation surface and the page router all read from the same table.

use adapters::Role;
use serde::Serialize;

/// Where unauthenticated visitors are sent.
pub const SIGN_IN_PATH: &str = "/auth";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRequirement {
    pub path: &'static str,
    pub title: &'static str,
    pub requires_auth: bool,
    pub required_role: Option<Role>,
}

impl RouteRequirement {
    /// Sign-in required, no particular role.
    pub const fn new(path: &'static str, title: &'static str) -> Self {
        Self {
            path,
            title,
            requires_auth: true,
            required_role: None,
        }
    }

    pub const fn public(path: &'static str, title: &'static str) -> Self {
        Self {
            path,
            title,
            requires_auth: false,
            required_role: None,
        }
    }

    pub const fn authenticated(path: &'static str, title: &'static str) -> Self {
        Self::new(path, title)
    }

    pub const fn with_role(path: &'static str, title: &'static str, role: Role) -> Self {
        Self {
            path,
            title,
            requires_auth: true,
            required_role: Some(role),
        }
    }

    pub fn is_public(&self) -> bool {
        !self.requires_auth && self.required_role.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteRequirement>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteRequirement>) -> Self {
        Self { routes }
    }

    pub fn standard() -> Self {
        Self::new(vec![
            RouteRequirement::public("/", "Home"),
            RouteRequirement::public("/about", "About"),
            RouteRequirement::public(SIGN_IN_PATH, "Sign In"),
            RouteRequirement::public("/videos", "Videos"),
            RouteRequirement::public("/lifestyle-diseases", "Diseases"),
            RouteRequirement::public("/seasonal", "Seasonal"),
            RouteRequirement::authenticated("/bmi", "BMI"),
            RouteRequirement::authenticated("/quiz", "Quiz"),
            RouteRequirement::authenticated("/diet", "Diet Guide"),
            RouteRequirement::authenticated("/community", "Community"),
            RouteRequirement::authenticated("/food-adulteration", "Food Safety"),
            RouteRequirement::with_role("/mentor", "Mentor", Role::User),
            RouteRequirement::with_role("/feedback", "Feedback", Role::User),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteRequirement> {
        self.routes.iter()
    }

    /// Exact view lookup.
    pub fn get(&self, path: &str) -> Option<&RouteRequirement> {
        self.routes.iter().find(|r| r.path == path)
    }

    /// The view a request path belongs to: the view itself, or the view named
    /// by its first segment (`/bmi/result` belongs to `/bmi`).
    pub fn requirement_for(&self, path: &str) -> Option<&RouteRequirement> {
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return self.get("/");
        }
        if let Some(exact) = self.get(trimmed) {
            return Some(exact);
        }

        let first_segment = trimmed.strip_prefix('/')?.split('/').next()?;
        if first_segment.is_empty() {
            return None;
        }
        self.get(&trimmed[..first_segment.len() + 1])
    }
}
