//! Startup sequence for the Warden admin service.
//!
//! Runs schema migrations and seeds the bootstrap admin account. Every
//! failure is returned to the caller so the process can shut down cleanly;
//! the one exception is losing the bootstrap-creation race to another
//! starting process, which is success.

use crate::auth::credential_store::{CredentialStore, SqlxCredentialStore};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::storage::{self, DbPool};
use tracing::info;

/// Prepare storage and seed required accounts. The service must not accept
/// traffic before this has succeeded: without the bootstrap account a fresh
/// deployment has no way to log in.
pub async fn run_startup_tasks(config: &AppConfig, pool: &DbPool) -> Result<()> {
    if config.database.auto_migrate {
        storage::run_migrations(pool).await?;
    } else {
        info!("Automatic migrations disabled, assuming schema is current");
    }

    let store = SqlxCredentialStore::new(pool.clone());
    store.ensure_bootstrap_account().await?;

    Ok(())
}
