//! Module for the signed-in account and the navigation surface.
//!
//! Kept apart from `auth`: nothing here changes the session, it only reports
//! on it.

pub mod handlers;
pub mod routes;
