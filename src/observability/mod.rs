//! # Observability Infrastructure
//!
//! Structured logging for the Warden admin service. Metrics and distributed
//! tracing exporters are intentionally absent; the `tracing` spans emitted
//! throughout the crate are rendered by the subscriber configured here.

pub mod logging;

pub use logging::init_logging;
