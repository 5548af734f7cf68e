//! # Warden
//!
//! Warden is the administrative backend for a hostel management platform:
//! credential-based login, signed session tokens with refresh, and a
//! bearer-protected college directory.
//!
//! ## Architecture
//!
//! The system follows a layered architecture pattern:
//!
//! ```text
//! REST API Layer → Authentication Gateway → Credential Store / Token Service
//!      ↓                    ↓                          ↓
//! Bearer Middleware   Audit Trail              Persistence Layer (sqlx)
//! ```
//!
//! ## Core Components
//!
//! - **AuthenticationGateway**: login, account creation, logout, refresh,
//!   and the bearer check shared by every protected endpoint
//! - **CredentialStore**: account records, Argon2id password hashing, and
//!   refresh-token state, behind a trait with an in-memory test double
//! - **TokenService**: HS256 session tokens over a fixed claims shape
//! - **REST API**: Axum handlers with Swagger UI documentation

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod startup;
pub mod storage;

// Re-export commonly used types and traits
pub use config::AppConfig;
pub use errors::{Result, WardenError};
pub use observability::init_logging;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
