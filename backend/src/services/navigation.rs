//! Navigation surface: which links the current session gets to see.
//!
//! Under the default policy a protected link is shown to any signed-in
//! identity and role checks happen only when the view is opened. The
//! `MirrorGuard` policy instead shows exactly the links the route guard would
//! let through right now.

use std::str::FromStr;

use serde::Serialize;

use crate::{
    auth::{evaluate, GuardDecision, Session},
    services::route_table::{RouteTable, SIGN_IN_PATH},
};

/// Link order as rendered, desktop and mobile alike.
const NAV_ORDER: [&str; 12] = [
    "/",
    "/bmi",
    "/quiz",
    "/diet",
    "/food-adulteration",
    "/lifestyle-diseases",
    "/seasonal",
    "/mentor",
    "/community",
    "/videos",
    "/feedback",
    "/about",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NavPolicy {
    #[default]
    AuthenticatedOnly,
    MirrorGuard,
}

impl FromStr for NavPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "authenticated" => Ok(NavPolicy::AuthenticatedOnly),
            "mirror-guard" => Ok(NavPolicy::MirrorGuard),
            other => Err(format!(
                "unknown navigation policy {other:?}, expected \"authenticated\" or \"mirror-guard\""
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub name: &'static str,
    pub path: &'static str,
    pub protected: bool,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AccountBadge {
    Loading,
    SignInPrompt { path: &'static str },
    SignedIn { email: String, role: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationView {
    pub links: Vec<NavLink>,
    pub account: AccountBadge,
    /// View the requested path belongs to, if any.
    pub active: Option<&'static str>,
}

pub fn visible_links(
    routes: &RouteTable,
    session: &Session,
    policy: NavPolicy,
    active: Option<&str>,
) -> Vec<NavLink> {
    NAV_ORDER
        .iter()
        .filter_map(|path| routes.get(path))
        .filter(|requirement| match policy {
            NavPolicy::AuthenticatedOnly => {
                requirement.is_public() || session.is_authenticated()
            }
            NavPolicy::MirrorGuard => evaluate(session, requirement) == GuardDecision::Allowed,
        })
        .map(|requirement| NavLink {
            name: requirement.title,
            path: requirement.path,
            protected: !requirement.is_public(),
            active: active == Some(requirement.path),
        })
        .collect()
}

pub fn account_badge(session: &Session) -> AccountBadge {
    if session.is_loading() {
        return AccountBadge::Loading;
    }
    match session.identity() {
        Some(identity) => AccountBadge::SignedIn {
            email: identity.email.clone(),
            role: session
                .role()
                .map_or_else(|| "none".to_string(), |r| r.to_string()),
        },
        None => AccountBadge::SignInPrompt { path: SIGN_IN_PATH },
    }
}

pub fn render(
    routes: &RouteTable,
    session: &Session,
    policy: NavPolicy,
    active: Option<&str>,
) -> NavigationView {
    let active = active
        .and_then(|path| routes.requirement_for(path))
        .map(|requirement| requirement.path);

    NavigationView {
        links: visible_links(routes, session, policy, active),
        account: account_badge(session),
        active,
    }
}

#[cfg(test)]
mod tests {
    use adapters::{Identity, Role};

    use super::*;

    fn paths(links: &[NavLink]) -> Vec<&'static str> {
        links.iter().map(|l| l.path).collect()
    }

    fn signed_in(role: Option<Role>) -> Session {
        Session::signed_in(Identity::new("ada@example.com"), role)
    }

    #[test]
    fn signed_out_sees_public_links_only() {
        let table = RouteTable::standard();
        let links = visible_links(&table, &Session::signed_out(), NavPolicy::default(), None);

        assert_eq!(
            paths(&links),
            vec!["/", "/lifestyle-diseases", "/seasonal", "/videos", "/about"]
        );
        assert!(links.iter().all(|l| !l.protected));
    }

    #[test]
    fn signed_in_sees_everything_regardless_of_role() {
        let table = RouteTable::standard();
        for role in [None, Some(Role::User), Some(Role::Premium), Some(Role::Guest)] {
            let links = visible_links(&table, &signed_in(role), NavPolicy::AuthenticatedOnly, None);
            assert_eq!(paths(&links), NAV_ORDER.to_vec());
        }
    }

    #[test]
    fn loading_shows_public_links_and_no_account() {
        let table = RouteTable::standard();
        let view = render(&table, &Session::pending(), NavPolicy::default(), None);
        assert!(view.links.iter().all(|l| !l.protected));
        assert_eq!(view.account, AccountBadge::Loading);
    }

    #[test]
    fn mirror_guard_hides_links_the_guard_would_deny() {
        let table = RouteTable::standard();
        let links = visible_links(&table, &signed_in(Some(Role::Premium)), NavPolicy::MirrorGuard, None);
        let shown = paths(&links);
        assert!(shown.contains(&"/bmi"));
        assert!(!shown.contains(&"/mentor"));
        assert!(!shown.contains(&"/feedback"));
    }

    #[test]
    fn badge_and_active_link() {
        let table = RouteTable::standard();
        let view = render(&table, &signed_in(None), NavPolicy::default(), Some("/quiz"));
        assert_eq!(
            view.account,
            AccountBadge::SignedIn {
                email: "ada@example.com".into(),
                role: "none".into(),
            }
        );
        let active: Vec<_> = view.links.iter().filter(|l| l.active).map(|l| l.path).collect();
        assert_eq!(active, vec!["/quiz"]);
        assert_eq!(view.active, Some("/quiz"));

        let nested = render(&table, &signed_in(None), NavPolicy::default(), Some("/bmi/result"));
        assert_eq!(nested.active, Some("/bmi"));

        let signed_out = render(&table, &Session::signed_out(), NavPolicy::default(), None);
        assert_eq!(signed_out.account, AccountBadge::SignInPrompt { path: "/auth" });
    }
}
