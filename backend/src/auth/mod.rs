//! Authentication module for managing the signed-in identity and access control.
//!
//! This module provides the public interface for the session store, role
//! resolution, the route guard middleware and the sign-in/sign-out endpoints.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod resolver;
pub mod routes;
pub mod service;

// Re-exports for convenience
pub use errors::*;
pub use middleware::*;
pub use models::*;
pub use resolver::*;
pub use routes::*;
pub use service::*;
