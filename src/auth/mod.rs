//! Authentication and authorization module entry point.
//!
//! Credential storage, password hashing, signed session tokens, the
//! authentication gateway, and the bearer middleware for protected routes.

pub mod credential_store;
pub mod gateway;
mod hashing;
pub mod middleware;
pub mod models;
pub mod token_service;

pub use credential_store::{CredentialStore, SqlxCredentialStore, BOOTSTRAP_USERNAME};
pub use gateway::AuthenticationGateway;
pub use models::{AccessLevel, Account, AuthError, CreateAccountRequest, LoginRequest};
pub use token_service::{SessionClaims, SigningKeyStore, TokenService};
