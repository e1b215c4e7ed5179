//! Module for the page views.
//!
//! Every entry of the route table is served as a static page descriptor;
//! whether it may be seen at all is decided by the route guard beforehand.

pub mod handlers;
pub mod routes;
