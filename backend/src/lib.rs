//! Healthy You application server.
//!
//! A local, single-user server for the Healthy You health-education pages.
//! One [`SessionStore`](auth::SessionStore) is built at start-up and shared by
//! every request: the route guard consults it before a protected view is
//! rendered, and the navigation surface reflects it on every change.

use std::sync::Arc;

use axum::Router;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod middleware;
pub mod services;
pub mod state;

use config::Config;
use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(api::views::routes::views_router(&state.routes))
        .merge(api::records::routes::records_router())
        .merge(api::user::routes::user_router())
        .merge(auth::auth_router())
        .fallback(api::views::handlers::not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::guard_route,
        ))
        .layer(middleware::trace_layer())
        .layer(middleware::cors_layer())
        .with_state(state)
}

pub async fn start_server(config: Config) -> anyhow::Result<()> {
    info!("Initializing state...");
    let state = AppState::new(config).await?;

    // Requests for protected views answer "loading" until this settles.
    let session = state.session.clone();
    tokio::spawn(async move {
        session.initialize().await;
    });
    state.session.watch_backend();

    let address = state.config.address();
    info!("Binding to {address}");
    let listener = TcpListener::bind(address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(err) => {
                warn!("Failed to install Ctrl+C handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                warn!("Failed to install signal handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
