//! # Database Migration Management
//!
//! Schema evolution via SQL migrations embedded in the binary and executed
//! on application startup when `auto_migrate` is enabled.

use crate::errors::{Result, WardenError};
use crate::storage::DbPool;
use tracing::info;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Run all pending migrations against the given pool.
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| WardenError::internal(format!("Failed to run database migrations: {}", e)))?;

    info!(migrations = MIGRATOR.migrations.len(), "Database migrations applied");
    Ok(())
}
