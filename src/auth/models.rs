//! Data models and request DTOs for the authentication subsystem.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::AccountId;
use crate::errors::WardenError;

lazy_static! {
    static ref USERNAME_REGEX: Regex =
        Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("USERNAME_REGEX should be a valid regex pattern");
}

/// Coarse authorization tier attached to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AccessLevel {
    Full,
    ReadOnly,
    ReadAndWrite,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Full => "full",
            AccessLevel::ReadOnly => "read-only",
            AccessLevel::ReadAndWrite => "read-and-write",
        }
    }
}

impl Display for AccessLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = AccessLevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(AccessLevel::Full),
            "read-only" => Ok(AccessLevel::ReadOnly),
            "read-and-write" => Ok(AccessLevel::ReadAndWrite),
            other => Err(AccessLevelParseError(other.to_string())),
        }
    }
}

/// Error returned when access level parsing fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid access level: {0}")]
pub struct AccessLevelParseError(pub String);

/// Stored representation of an administrative account. The password hash
/// never leaves the credential store, so it is not part of this type.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub access_level: AccessLevel,
    /// The single currently-valid refresh token; empty when logged out.
    pub refresh_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New account payload. Carries the plaintext password only for the duration
/// of the create call; the store persists a hash.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub access_level: AccessLevel,
}

/// Tokens minted by a successful login.
#[derive(Debug, Clone)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 3, max = 20, message = "username must be 3-20 characters"))]
    pub username: String,
    #[validate(length(min = 8, max = 64, message = "password must be 8-64 characters"))]
    pub password: String,
}

/// Create-account request body. `excess_level` keeps the wire spelling the
/// existing clients already send.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAccountRequest {
    #[validate(length(min = 3, max = 20, message = "username must be 3-20 characters"))]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 8, max = 64, message = "password must be 8-64 characters"))]
    pub password: String,
    #[serde(rename = "excess_level")]
    pub access_level: AccessLevel,
}

impl CreateAccountRequest {
    /// Character-set check layered on top of the derive validations:
    /// usernames are identifiers, not free text.
    pub fn validate_username_charset(&self) -> Result<(), WardenError> {
        if USERNAME_REGEX.is_match(&self.username) {
            Ok(())
        } else {
            Err(WardenError::validation_field(
                "username may only contain letters, digits, '.', '_' and '-'",
                "username",
            ))
        }
    }
}

impl From<CreateAccountRequest> for NewAccount {
    fn from(request: CreateAccountRequest) -> Self {
        Self {
            username: request.username,
            email: request.email,
            password: request.password,
            access_level: request.access_level,
        }
    }
}

/// Refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "refreshToken must not be empty"))]
    pub refresh_token: String,
}

/// Errors returned by credential verification. The distinction between the
/// variants is for logs and audit only; HTTP callers see one uniform
/// bad-credentials answer.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("account not found")]
    AccountNotFound,
    #[error("password mismatch")]
    PasswordMismatch,
    #[error(transparent)]
    Storage(#[from] WardenError),
}

/// Errors returned by the authentication gateway and middleware.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unauthorized: authorization header missing")]
    MissingBearer,
    #[error("unauthorized: malformed authorization header")]
    MalformedBearer,
    #[error("unauthorized: malformed token")]
    MalformedToken,
    #[error("unauthorized: invalid token signature")]
    InvalidSignature,
    #[error("unauthorized: token has expired")]
    ExpiredToken,
    #[error("unauthorized: session is no longer valid")]
    InvalidSession,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error(transparent)]
    Persistence(#[from] WardenError),
}
