//! Authentication gateway: login, account creation, logout, refresh, and
//! the bearer check shared by every protected endpoint.
//!
//! Per-account session state machine: login persists a refresh token and
//! hands both tokens to the caller; refresh reissues the access token
//! against the stored refresh token without mutating it; logout clears the
//! stored token, after which refresh attempts fail until the next login.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::auth::credential_store::CredentialStore;
use crate::auth::models::{
    Account, AuthError, CreateAccountRequest, CredentialError, LoginRequest, SessionTokens,
};
use crate::auth::token_service::{SessionClaims, TokenService};
use crate::errors::WardenError;
use crate::storage::{AuditEvent, AuditLogRepository};

#[derive(Clone)]
pub struct AuthenticationGateway {
    credential_store: Arc<dyn CredentialStore>,
    token_service: TokenService,
    audit_repository: Arc<AuditLogRepository>,
}

impl AuthenticationGateway {
    pub fn new(
        credential_store: Arc<dyn CredentialStore>,
        token_service: TokenService,
        audit_repository: Arc<AuditLogRepository>,
    ) -> Self {
        Self { credential_store, token_service, audit_repository }
    }

    /// Authenticate a username/password pair, mint an access and refresh
    /// token, and persist the refresh token as the account's single valid
    /// session.
    ///
    /// Credential failures are reported uniformly: the caller cannot tell
    /// whether the username or the password was wrong.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: &LoginRequest) -> Result<SessionTokens, AuthError> {
        request.validate().map_err(WardenError::from)?;

        let account_id = match self
            .credential_store
            .verify_credentials(&request.username, &request.password)
            .await
        {
            Ok(id) => id,
            Err(CredentialError::AccountNotFound) => {
                warn!(username = %request.username, "login attempt for unknown account");
                self.record_event(
                    "auth.login.failed",
                    None,
                    Some(&request.username),
                    json!({ "reason": "account_not_found" }),
                )
                .await;
                return Err(AuthError::InvalidCredentials);
            }
            Err(CredentialError::PasswordMismatch) => {
                warn!(username = %request.username, "login attempt with incorrect password");
                self.record_event(
                    "auth.login.failed",
                    None,
                    Some(&request.username),
                    json!({ "reason": "password_mismatch" }),
                )
                .await;
                return Err(AuthError::InvalidCredentials);
            }
            Err(CredentialError::Storage(err)) => return Err(err.into()),
        };

        let access_token = self.token_service.issue_access_token(&account_id)?;
        let refresh_token = self.token_service.issue_refresh_token(&account_id)?;

        // The stored token is the session: persisting it invalidates any
        // previously issued refresh token for this account.
        self.credential_store.update_refresh_token(&account_id, &refresh_token).await?;

        self.record_event(
            "auth.login.success",
            Some(account_id.as_str()),
            Some(&request.username),
            json!({}),
        )
        .await;

        info!(account_id = %account_id, "login succeeded");
        Ok(SessionTokens { access_token, refresh_token })
    }

    /// Create a new administrative account. The bearer check happens in the
    /// authentication middleware before this is reached; `created_by` is the
    /// subject of that bearer token.
    #[instrument(skip(self, request), fields(username = %request.username, created_by = %created_by.sub))]
    pub async fn create_account(
        &self,
        created_by: &SessionClaims,
        request: CreateAccountRequest,
    ) -> Result<Account, AuthError> {
        request.validate().map_err(WardenError::from)?;
        request.validate_username_charset()?;

        let account = self.credential_store.create_account(request.into()).await?;

        self.record_event(
            "auth.account.created",
            Some(account.id.as_str()),
            Some(&account.username),
            json!({ "created_by": created_by.sub, "access_level": account.access_level.as_str() }),
        )
        .await;

        info!(account_id = %account.id, "account created");
        Ok(account)
    }

    /// End the caller's session by clearing the stored refresh token.
    #[instrument(skip(self, claims), fields(account_id = %claims.sub))]
    pub async fn logout(&self, claims: &SessionClaims) -> Result<(), AuthError> {
        let account_id = claims.account_id();

        match self.credential_store.update_refresh_token(&account_id, "").await {
            Ok(()) => {}
            // The account vanished out from under a valid token; the session
            // is gone either way.
            Err(WardenError::NotFound { .. }) => return Err(AuthError::InvalidSession),
            Err(err) => return Err(err.into()),
        }

        self.record_event("auth.logout", Some(claims.sub.as_str()), None, json!({})).await;

        Ok(())
    }

    /// Exchange a refresh token for a fresh access token. The presented
    /// token must verify *and* match the account's stored refresh token;
    /// a cleared or superseded token fails with `InvalidSession` and the
    /// caller must log in again. The stored token is not rotated.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = match self.token_service.verify_token(refresh_token) {
            Ok(claims) => claims,
            Err(AuthError::ExpiredToken) => return Err(AuthError::InvalidSession),
            Err(err) => return Err(err),
        };

        let stored = self.credential_store.fetch_refresh_token(&claims.account_id()).await?;
        match stored {
            Some(token) if !token.is_empty() && token == refresh_token => {}
            _ => {
                warn!(account_id = %claims.sub, "refresh attempt with stale or cleared token");
                return Err(AuthError::InvalidSession);
            }
        }

        self.token_service.refresh_access_token(refresh_token)
    }

    /// Shared authorization check for protected operations. Expects a header
    /// of the exact form `Bearer <token>`; any other shape is rejected
    /// before the token is parsed.
    pub fn authorize(&self, bearer_header: &str) -> Result<SessionClaims, AuthError> {
        if bearer_header.is_empty() {
            return Err(AuthError::MissingBearer);
        }

        let parts: Vec<&str> = bearer_header.split(' ').collect();
        if parts.len() != 2 || parts[0] != "Bearer" || parts[1].is_empty() {
            return Err(AuthError::MalformedBearer);
        }

        self.token_service.verify_token(parts[1])
    }

    async fn record_event(
        &self,
        event_type: &str,
        account_id: Option<&str>,
        username: Option<&str>,
        metadata: serde_json::Value,
    ) {
        let event = AuditEvent::auth(event_type, account_id, username, metadata);
        // Audit writes never break the guarded operation.
        if let Err(err) = self.audit_repository.record_auth_event(event).await {
            warn!(error = %err, event_type, "failed to record auth audit event");
        }
    }
}
