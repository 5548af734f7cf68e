//! Account persistence: credential verification, password hashing, and
//! refresh-token state.
//!
//! The [`CredentialStore`] trait is the seam between the authentication
//! gateway and the storage engine; `SqlxCredentialStore` is the production
//! implementation and an in-memory fake backs the gateway unit tests.

use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::{info, instrument, warn};

use crate::auth::hashing;
use crate::auth::models::{AccessLevel, Account, CredentialError, NewAccount};
use crate::domain::AccountId;
use crate::errors::{Result, WardenError};
use crate::storage::DbPool;
use std::str::FromStr;

/// Reserved username seeded at process start.
pub const BOOTSTRAP_USERNAME: &str = "admin";
/// Initial password for the bootstrap account; operators are expected to
/// rotate it after first login.
pub const BOOTSTRAP_PASSWORD: &str = "password@123";
const BOOTSTRAP_EMAIL: &str = "admin@admin.com";

/// Pre-computed dummy hash for timing-safe user enumeration prevention.
/// When an unknown username is presented we still run Argon2 verification
/// against this hash so response time matches real verification.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hashing::hash_password("dummy_startup_value")
        .unwrap_or_else(|_| "$argon2id$v=19$m=19456,t=2,p=1$dW5rbm93bg$dW5rbm93bg".to_string())
});

/// Storage interface for administrative accounts.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Create a new account; fails with a conflict when the username or
    /// email is already taken. The persisted record starts logged out
    /// (empty refresh token).
    async fn create_account(&self, account: NewAccount) -> Result<Account>;

    /// Check a username/password pair and return the account id on success.
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> std::result::Result<AccountId, CredentialError>;

    /// Atomically replace the refresh token for an account. The new value
    /// becomes the sole valid refresh token; an empty string logs the
    /// account out.
    async fn update_refresh_token(&self, id: &AccountId, token: &str) -> Result<()>;

    /// Read the currently persisted refresh token for an account.
    async fn fetch_refresh_token(&self, id: &AccountId) -> Result<Option<String>>;

    /// Seed the reserved bootstrap account if it does not exist. Idempotent,
    /// and tolerant of losing a creation race to another starting process.
    async fn ensure_bootstrap_account(&self) -> Result<()>;
}

// Database row structure

#[derive(Debug, Clone, FromRow)]
struct AccountRow {
    id: String,
    username: String,
    email: String,
    password_hash: String,
    access_level: String,
    refresh_token: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct CredentialRow {
    id: String,
    password_hash: String,
}

/// SQLite-backed credential store.
#[derive(Debug, Clone)]
pub struct SqlxCredentialStore {
    pool: DbPool,
}

impl SqlxCredentialStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn row_to_account(row: AccountRow) -> Result<Account> {
        let access_level = AccessLevel::from_str(&row.access_level).map_err(|_| {
            WardenError::validation(format!("Unknown access level '{}'", row.access_level))
        })?;

        Ok(Account {
            id: AccountId::from_string(row.id),
            username: row.username,
            email: row.email,
            access_level,
            refresh_token: row.refresh_token,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    async fn get_account(&self, id: &AccountId) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>("SELECT * FROM admin_accounts WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| WardenError::Database {
                source: err,
                context: "Failed to fetch account".to_string(),
            })?;

        row.map(Self::row_to_account).transpose()
    }
}

#[async_trait]
impl CredentialStore for SqlxCredentialStore {
    #[instrument(skip(self, account), fields(username = %account.username), name = "db_create_account")]
    async fn create_account(&self, account: NewAccount) -> Result<Account> {
        let id = AccountId::new();
        let password_hash = hashing::hash_password(&account.password)?;
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO admin_accounts
                (id, username, email, password_hash, access_level, refresh_token, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, '', $6, $7)
            "#,
        )
        .bind(id.as_str())
        .bind(&account.username)
        .bind(&account.email)
        .bind(&password_hash)
        .bind(account.access_level.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {}
            Err(err)
                if err
                    .as_database_error()
                    .map(|db_err| db_err.is_unique_violation())
                    .unwrap_or(false) =>
            {
                return Err(WardenError::conflict(
                    "An account with this username or email already exists",
                    "account",
                ));
            }
            Err(err) => {
                return Err(WardenError::Database {
                    source: err,
                    context: "Failed to create account".to_string(),
                });
            }
        }

        self.get_account(&id)
            .await?
            .ok_or_else(|| WardenError::internal("Account not found after creation"))
    }

    #[instrument(skip(self, password), fields(username = %username), name = "db_verify_credentials")]
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> std::result::Result<AccountId, CredentialError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            "SELECT id, password_hash FROM admin_accounts WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| {
            CredentialError::Storage(WardenError::Database {
                source: err,
                context: "Failed to fetch credentials".to_string(),
            })
        })?;

        let row = match row {
            Some(row) => row,
            None => {
                // Timing-safe enumeration prevention: burn the same hashing
                // work as a real verification.
                if let Err(e) = hashing::verify_password(password, &DUMMY_HASH) {
                    warn!(error = %e, "dummy hash verification failed unexpectedly");
                }
                return Err(CredentialError::AccountNotFound);
            }
        };

        if !hashing::verify_password(password, &row.password_hash)? {
            return Err(CredentialError::PasswordMismatch);
        }

        Ok(AccountId::from_string(row.id))
    }

    #[instrument(skip(self, token), fields(account_id = %id), name = "db_update_refresh_token")]
    async fn update_refresh_token(&self, id: &AccountId, token: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE admin_accounts SET refresh_token = $1, updated_at = $2 WHERE id = $3",
        )
        .bind(token)
        .bind(Utc::now())
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|err| WardenError::Database {
            source: err,
            context: "Failed to update refresh token".to_string(),
        })?;

        if result.rows_affected() == 0 {
            return Err(WardenError::not_found("account", id.as_str()));
        }

        Ok(())
    }

    #[instrument(skip(self), fields(account_id = %id), name = "db_fetch_refresh_token")]
    async fn fetch_refresh_token(&self, id: &AccountId) -> Result<Option<String>> {
        let token = sqlx::query_scalar::<_, String>(
            "SELECT refresh_token FROM admin_accounts WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| WardenError::Database {
            source: err,
            context: "Failed to fetch refresh token".to_string(),
        })?;

        Ok(token)
    }

    #[instrument(skip(self), name = "db_ensure_bootstrap_account")]
    async fn ensure_bootstrap_account(&self) -> Result<()> {
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM admin_accounts WHERE username = $1",
        )
        .bind(BOOTSTRAP_USERNAME)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| WardenError::Database {
            source: err,
            context: "Failed to look up bootstrap account".to_string(),
        })?;

        if existing > 0 {
            return Ok(());
        }

        let bootstrap = NewAccount {
            username: BOOTSTRAP_USERNAME.to_string(),
            email: BOOTSTRAP_EMAIL.to_string(),
            password: BOOTSTRAP_PASSWORD.to_string(),
            access_level: AccessLevel::Full,
        };

        match self.create_account(bootstrap).await {
            Ok(account) => {
                info!(account_id = %account.id, "Bootstrap admin account created");
                Ok(())
            }
            // Another process won the creation race; the account exists,
            // which is all this call promises.
            Err(WardenError::Conflict { .. }) => {
                info!("Bootstrap admin account already created by a concurrent process");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory credential store for exercising the gateway without a
    //! database.

    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Clone)]
    struct StoredAccount {
        account: Account,
        password_hash: String,
    }

    #[derive(Default)]
    pub struct InMemoryCredentialStore {
        accounts: Mutex<HashMap<String, StoredAccount>>,
    }

    impl InMemoryCredentialStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl CredentialStore for InMemoryCredentialStore {
        async fn create_account(&self, account: NewAccount) -> Result<Account> {
            let password_hash = hashing::hash_password(&account.password)?;
            let mut accounts = self.accounts.lock().unwrap();

            let duplicate = accounts.values().any(|stored| {
                stored.account.username == account.username
                    || stored.account.email == account.email
            });
            if duplicate {
                return Err(WardenError::conflict(
                    "An account with this username or email already exists",
                    "account",
                ));
            }

            let now = Utc::now();
            let created = Account {
                id: AccountId::new(),
                username: account.username,
                email: account.email,
                access_level: account.access_level,
                refresh_token: String::new(),
                created_at: now,
                updated_at: now,
            };
            accounts.insert(
                created.id.to_string(),
                StoredAccount { account: created.clone(), password_hash },
            );
            Ok(created)
        }

        async fn verify_credentials(
            &self,
            username: &str,
            password: &str,
        ) -> std::result::Result<AccountId, CredentialError> {
            let stored = {
                let accounts = self.accounts.lock().unwrap();
                accounts.values().find(|s| s.account.username == username).cloned()
            };

            let stored = stored.ok_or(CredentialError::AccountNotFound)?;
            if !hashing::verify_password(password, &stored.password_hash)? {
                return Err(CredentialError::PasswordMismatch);
            }
            Ok(stored.account.id)
        }

        async fn update_refresh_token(&self, id: &AccountId, token: &str) -> Result<()> {
            let mut accounts = self.accounts.lock().unwrap();
            let stored = accounts
                .get_mut(id.as_str())
                .ok_or_else(|| WardenError::not_found("account", id.as_str()))?;
            stored.account.refresh_token = token.to_string();
            stored.account.updated_at = Utc::now();
            Ok(())
        }

        async fn fetch_refresh_token(&self, id: &AccountId) -> Result<Option<String>> {
            let accounts = self.accounts.lock().unwrap();
            Ok(accounts.get(id.as_str()).map(|s| s.account.refresh_token.clone()))
        }

        async fn ensure_bootstrap_account(&self) -> Result<()> {
            let bootstrap = NewAccount {
                username: BOOTSTRAP_USERNAME.to_string(),
                email: BOOTSTRAP_EMAIL.to_string(),
                password: BOOTSTRAP_PASSWORD.to_string(),
                access_level: AccessLevel::Full,
            };
            match self.create_account(bootstrap).await {
                Ok(_) | Err(WardenError::Conflict { .. }) => Ok(()),
                Err(err) => Err(err),
            }
        }
    }
}
