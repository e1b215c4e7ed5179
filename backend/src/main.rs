//! Main entry point for the Healthy You backend.
//!
//! Initializes logging, loads configuration from the environment and hands
//! over to the server.

use backend::{config::Config, start_server};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    fmt().with_env_filter(filter).init();

    let config = Config::load()?;
    start_server(config).await
}
