//! Signed session tokens: issuance, verification, and reissue.
//!
//! Access and refresh tokens are compact HS256 JWTs over a fixed
//! [`SessionClaims`] shape. The service holds only immutable key material
//! and the duration policy, so any number of concurrent verifications and
//! issuances are safe without coordination.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::models::AuthError;
use crate::config::AuthConfig;
use crate::domain::AccountId;
use crate::errors::{Result, WardenError};

/// Claims embedded in every session token. Tokens whose claim set does not
/// deserialize into this shape are rejected as malformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the account id
    pub sub: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch); the expiry instant itself is expired
    pub exp: i64,
}

impl SessionClaims {
    pub fn account_id(&self) -> AccountId {
        AccountId::from_string(self.sub.clone())
    }
}

/// Holds the symmetric secret and the token-duration policy. Immutable
/// after construction.
pub struct SigningKeyStore {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
}

impl SigningKeyStore {
    pub fn new(secret: &[u8], access_token_ttl: Duration, refresh_token_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked manually below: the boundary is exclusive of
        // validity (exp == now is already expired) and no leeway applies.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_token_ttl,
            refresh_token_ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.jwt_secret.as_bytes(),
            Duration::minutes(config.access_token_ttl_minutes),
            Duration::days(config.refresh_token_ttl_days),
        )
    }
}

/// Issues and verifies signed session tokens.
#[derive(Clone)]
pub struct TokenService {
    keys: Arc<SigningKeyStore>,
}

impl TokenService {
    pub fn new(keys: Arc<SigningKeyStore>) -> Self {
        Self { keys }
    }

    /// Issue a short-lived access token for the given subject.
    pub fn issue_access_token(&self, subject: &AccountId) -> Result<String> {
        self.issue(subject, self.keys.access_token_ttl)
    }

    /// Issue a long-lived refresh token for the given subject.
    pub fn issue_refresh_token(&self, subject: &AccountId) -> Result<String> {
        self.issue(subject, self.keys.refresh_token_ttl)
    }

    fn issue(&self, subject: &AccountId, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.keys.encoding_key)
            .map_err(|err| WardenError::internal(format!("Failed to sign token: {}", err)))
    }

    /// Decode a token, check its signature and expiry, and return the claims.
    pub fn verify_token(&self, token: &str) -> std::result::Result<SessionClaims, AuthError> {
        let data = decode::<SessionClaims>(token, &self.keys.decoding_key, &self.keys.validation)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::MalformedToken,
            })?;

        let claims = data.claims;
        if Utc::now().timestamp() >= claims.exp {
            return Err(AuthError::ExpiredToken);
        }

        Ok(claims)
    }

    /// Verify a refresh token and mint a fresh access token for the same
    /// subject. Stateless: any session bookkeeping is the gateway's job.
    pub fn refresh_access_token(&self, refresh_token: &str) -> std::result::Result<String, AuthError> {
        let claims = self.verify_token(refresh_token)?;
        self.issue_access_token(&claims.account_id()).map_err(AuthError::from)
    }
}
