//! # HTTP API
//!
//! Axum handlers, router assembly, error mapping, and the API server.

pub mod auth_handlers;
pub mod college_handlers;
pub mod docs;
pub mod error;
pub mod routes;
pub mod server;

pub use routes::{build_router, ApiState};
pub use server::start_api_server;
