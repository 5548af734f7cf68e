//! # Error Handling
//!
//! Crate-wide error types for the Warden admin service, built on `thiserror`.
//! HTTP mapping lives in `api::error`; this module only knows the taxonomy.

/// Custom result type for Warden operations
pub type Result<T> = std::result::Result<T, WardenError>;

/// Main error type for the Warden admin service
#[derive(thiserror::Error, Debug)]
pub enum WardenError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database and storage errors
    #[error("Database error: {context}")]
    Database {
        #[source]
        source: sqlx::Error,
        context: String,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: String,
    },

    /// Validation errors (malformed or out-of-constraint input)
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Resource not found errors
    #[error("Resource not found: {resource_type} with ID '{id}'")]
    NotFound { resource_type: String, id: String },

    /// Resource conflict errors (e.g., already exists)
    #[error("Resource conflict: {message}")]
    Conflict {
        message: String,
        resource_type: String,
    },

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl WardenError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a database error with context
    pub fn database<S: Into<String>>(source: sqlx::Error, context: S) -> Self {
        Self::Database { source, context: context.into() }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into(), field: None }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }

    /// Create a not found error
    pub fn not_found<R: Into<String>, I: Into<String>>(resource_type: R, id: I) -> Self {
        Self::NotFound { resource_type: resource_type.into(), id: id.into() }
    }

    /// Create a conflict error
    pub fn conflict<M: Into<String>, R: Into<String>>(message: M, resource_type: R) -> Self {
        Self::Conflict { message: message.into(), resource_type: resource_type.into() }
    }

    /// Create an internal server error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get the HTTP status code that should be returned for this error
    pub fn status_code(&self) -> u16 {
        match self {
            WardenError::Config { .. } => 500,
            WardenError::Database { .. } => 500,
            WardenError::Io { .. } => 500,
            WardenError::Serialization { .. } => 400,
            WardenError::Validation { .. } => 400,
            WardenError::NotFound { .. } => 404,
            // Duplicate accounts and records surface as plain bad requests.
            WardenError::Conflict { .. } => 400,
            WardenError::Internal { .. } => 500,
        }
    }

    /// Whether this error is caused by a unique-constraint violation in the
    /// storage engine. Used to distinguish duplicate-key races from real
    /// storage failures.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            WardenError::Database { source, .. } => source
                .as_database_error()
                .map(|db_err| db_err.is_unique_violation())
                .unwrap_or(false),
            _ => false,
        }
    }
}

// Error conversions for common external error types
impl From<sqlx::Error> for WardenError {
    fn from(error: sqlx::Error) -> Self {
        Self::Database { source: error, context: "Database operation failed".to_string() }
    }
}

impl From<serde_json::Error> for WardenError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization { source: error, context: "JSON serialization failed".to_string() }
    }
}

impl From<validator::ValidationErrors> for WardenError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self::validation(format!("Validation failed: {}", message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = WardenError::config("Test configuration error");
        assert!(matches!(error, WardenError::Config { .. }));
        assert_eq!(error.to_string(), "Configuration error: Test configuration error");
    }

    #[test]
    fn test_validation_error() {
        let error = WardenError::validation_field("Invalid email format", "email");
        assert!(matches!(error, WardenError::Validation { .. }));
        if let WardenError::Validation { field, .. } = error {
            assert_eq!(field, Some("email".to_string()));
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(WardenError::validation("test").status_code(), 400);
        assert_eq!(WardenError::not_found("account", "test").status_code(), 404);
        assert_eq!(WardenError::conflict("test", "account").status_code(), 400);
        assert_eq!(WardenError::internal("test").status_code(), 500);
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let warden_error: WardenError = io_error.into();
        assert!(matches!(warden_error, WardenError::Io { .. }));

        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let warden_error: WardenError = json_error.into();
        assert!(matches!(warden_error, WardenError::Serialization { .. }));
    }
}
