//! # Configuration Management
//!
//! Environment-driven configuration for the Warden admin service. Every
//! section can be built from environment variables with sensible defaults,
//! and the assembled configuration is validated before the server starts.

use crate::errors::{Result, WardenError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct AppConfig {
    /// HTTP server configuration
    #[validate(nested)]
    pub server: ServerConfig,

    /// Database configuration
    #[validate(nested)]
    pub database: DatabaseConfig,

    /// Authentication configuration
    #[validate(nested)]
    pub auth: AuthConfig,

    /// Observability configuration
    #[validate(nested)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let config = Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env()?,
            observability: ObservabilityConfig::from_env(),
        };
        config.validate_config()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate_config(&self) -> Result<()> {
        Validate::validate(self).map_err(WardenError::from)?;
        self.validate_custom()
    }

    /// Custom validation logic that goes beyond what the validator crate can do
    fn validate_custom(&self) -> Result<()> {
        if !self.database.url.starts_with("sqlite://") {
            return Err(WardenError::validation("Database URL must start with 'sqlite://'"));
        }

        // Short symmetric secrets make offline brute force of the token
        // signature feasible.
        if self.auth.jwt_secret.len() < 32 {
            return Err(WardenError::validation(
                "JWT secret must be at least 32 characters long",
            ));
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// Server bind address
    #[validate(length(min = 1, message = "Host cannot be empty"))]
    pub host: String,

    /// Server port
    #[validate(range(min = 1, max = 65535, message = "Port must be between 1 and 65535"))]
    pub port: u16,

    /// Enable permissive CORS for browser clients
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 8080, enable_cors: true }
    }
}

impl ServerConfig {
    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Create ServerConfig from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: read_string("WARDEN_API_HOST", defaults.host),
            port: read_parsed("WARDEN_API_PORT", defaults.port),
            enable_cors: read_bool("WARDEN_ENABLE_CORS", defaults.enable_cors),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[validate(length(min = 1, message = "Database URL cannot be empty"))]
    pub url: String,

    /// Maximum number of connections in the pool
    #[validate(range(min = 1, max = 100, message = "Max connections must be between 1 and 100"))]
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    #[validate(range(max = 50, message = "Min connections must be between 0 and 50"))]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[validate(range(
        min = 1,
        max = 60,
        message = "Connect timeout must be between 1 and 60 seconds"
    ))]
    pub connect_timeout_seconds: u64,

    /// Idle timeout in seconds (0 = no timeout)
    pub idle_timeout_seconds: u64,

    /// Enable automatic migrations on startup
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./data/warden.db".to_string(),
            max_connections: 10,
            min_connections: 0,
            connect_timeout_seconds: 10,
            idle_timeout_seconds: 600,
            auto_migrate: true,
        }
    }
}

impl DatabaseConfig {
    /// Get connection timeout as Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    /// Get idle timeout as Duration (None if 0)
    pub fn idle_timeout(&self) -> Option<Duration> {
        if self.idle_timeout_seconds == 0 {
            None
        } else {
            Some(Duration::from_secs(self.idle_timeout_seconds))
        }
    }

    /// Check if this is a SQLite configuration
    pub fn is_sqlite(&self) -> bool {
        self.url.starts_with("sqlite://")
    }

    /// Create DatabaseConfig from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: read_string("DATABASE_URL", defaults.url),
            max_connections: read_parsed("DATABASE_MAX_CONNECTIONS", defaults.max_connections),
            min_connections: read_parsed("DATABASE_MIN_CONNECTIONS", defaults.min_connections),
            connect_timeout_seconds: read_parsed(
                "DATABASE_CONNECT_TIMEOUT_SECONDS",
                defaults.connect_timeout_seconds,
            ),
            idle_timeout_seconds: read_parsed(
                "DATABASE_IDLE_TIMEOUT_SECONDS",
                defaults.idle_timeout_seconds,
            ),
            auto_migrate: read_bool("DATABASE_AUTO_MIGRATE", defaults.auto_migrate),
        }
    }
}

/// Authentication configuration: the shared signing secret and the token
/// duration policy. Immutable for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct AuthConfig {
    /// Symmetric secret for token signing/verification
    pub jwt_secret: String,

    /// Access token lifetime in minutes
    #[validate(range(min = 1, message = "Access token TTL must be at least one minute"))]
    pub access_token_ttl_minutes: i64,

    /// Refresh token lifetime in days
    #[validate(range(min = 1, message = "Refresh token TTL must be at least one day"))]
    pub refresh_token_ttl_days: i64,
}

impl AuthConfig {
    /// Create AuthConfig from environment variables.
    ///
    /// The signing secret has no default: a process without
    /// `WARDEN_JWT_SECRET` must not come up issuing forgeable tokens.
    pub fn from_env() -> Result<Self> {
        let jwt_secret = std::env::var("WARDEN_JWT_SECRET")
            .map_err(|_| WardenError::config("WARDEN_JWT_SECRET must be set"))?;

        Ok(Self {
            jwt_secret,
            access_token_ttl_minutes: read_parsed("WARDEN_ACCESS_TOKEN_TTL_MINUTES", 30),
            refresh_token_ttl_days: read_parsed("WARDEN_REFRESH_TOKEN_TTL_DAYS", 30),
        })
    }
}

/// Observability configuration for structured logging
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,

    /// Service name reported in logs
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub service_name: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self { log_level: "info".to_string(), json_logging: false, service_name: "warden".to_string() }
    }
}

impl ObservabilityConfig {
    /// Create ObservabilityConfig from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_level: read_string("WARDEN_LOG_LEVEL", defaults.log_level),
            json_logging: read_bool("WARDEN_LOG_JSON", defaults.json_logging),
            service_name: defaults.service_name,
        }
    }
}

fn read_string(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn read_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|s| s.parse::<T>().ok()).unwrap_or(default)
}

fn read_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|s| s.trim().eq_ignore_ascii_case("true") || s.trim() == "1")
        .unwrap_or(default)
}
