//! Append-only audit trail for authentication events.
//!
//! Recording an event must never fail the operation being audited; callers
//! log and continue on error.

use crate::errors::{Result, WardenError};
use crate::storage::DbPool;
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

/// A single authentication event.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub event_type: String,
    pub account_id: Option<String>,
    pub username: Option<String>,
    pub metadata: serde_json::Value,
}

impl AuditEvent {
    /// Build an auth event with optional subject context.
    pub fn auth(
        event_type: &str,
        account_id: Option<&str>,
        username: Option<&str>,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            event_type: event_type.to_string(),
            account_id: account_id.map(|s| s.to_string()),
            username: username.map(|s| s.to_string()),
            metadata,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: DbPool,
}

impl AuditLogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, event), fields(event_type = %event.event_type), name = "db_record_auth_event")]
    pub async fn record_auth_event(&self, event: AuditEvent) -> Result<()> {
        let metadata = serde_json::to_string(&event.metadata)?;

        sqlx::query(
            r#"
            INSERT INTO auth_audit_log (id, event_type, account_id, username, metadata, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&event.event_type)
        .bind(&event.account_id)
        .bind(&event.username)
        .bind(&metadata)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| WardenError::Database {
            source: err,
            context: "Failed to record auth audit event".to_string(),
        })?;

        Ok(())
    }

    /// Count events of a given type; used by tests and admin tooling.
    pub async fn count_events(&self, event_type: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM auth_audit_log WHERE event_type = $1",
        )
        .bind(event_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| WardenError::Database {
            source: err,
            context: "Failed to count audit events".to_string(),
        })?;

        Ok(count)
    }
}
