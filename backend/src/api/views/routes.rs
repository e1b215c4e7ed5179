//! Registers one page route per entry of the route table.

use std::sync::Arc;

use axum::{routing::get, Router};

use super::handlers::render_page;
use crate::{services::route_table::RouteTable, state::AppState};

pub fn views_router(routes: &RouteTable) -> Router<Arc<AppState>> {
    routes
        .iter()
        .fold(Router::new(), |router, requirement| {
            router.route(requirement.path, get(render_page))
        })
}
