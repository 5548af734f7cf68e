//! College directory records.
//!
//! The `unique_name` column is the stable lookup key for updates and
//! deletion; deletion is a soft delete so listings can opt back in to
//! removed entries.

use crate::domain::RecordId;
use crate::errors::{Result, WardenError};
use crate::storage::DbPool;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::instrument;
use utoipa::ToSchema;

#[derive(Debug, Clone, FromRow)]
struct CollegeRecordRow {
    id: String,
    name: String,
    unique_name: String,
    address: String,
    pin_code: String,
    icon: String,
    strength: i64,
    mark_as_deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Stored representation of a college record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CollegeRecord {
    pub id: RecordId,
    pub name: String,
    pub unique_name: String,
    pub address: String,
    pub pin_code: String,
    pub icon: String,
    pub strength: i64,
    pub mark_as_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New record payload.
#[derive(Debug, Clone)]
pub struct NewCollegeRecord {
    pub name: String,
    pub unique_name: String,
    pub address: String,
    pub pin_code: String,
    pub icon: String,
    pub strength: i64,
}

/// Update payload; `unique_name` selects the record, present fields replace
/// the stored values.
#[derive(Debug, Clone, Default)]
pub struct UpdateCollegeRecord {
    pub name: Option<String>,
    pub address: Option<String>,
    pub pin_code: Option<String>,
    pub icon: Option<String>,
    pub strength: Option<i64>,
}

/// Listing filter.
#[derive(Debug, Clone)]
pub struct CollegeRecordFilter {
    pub pin_code: Option<String>,
    pub include_deleted: bool,
    pub limit: i64,
    pub offset: i64,
}

impl Default for CollegeRecordFilter {
    fn default() -> Self {
        Self { pin_code: None, include_deleted: false, limit: 10, offset: 0 }
    }
}

#[derive(Debug, Clone)]
pub struct CollegeRecordRepository {
    pool: DbPool,
}

impl CollegeRecordRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: CollegeRecordRow) -> CollegeRecord {
        CollegeRecord {
            id: RecordId::from_string(row.id),
            name: row.name,
            unique_name: row.unique_name,
            address: row.address,
            pin_code: row.pin_code,
            icon: row.icon,
            strength: row.strength,
            mark_as_deleted: row.mark_as_deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    #[instrument(skip(self, record), fields(unique_name = %record.unique_name), name = "db_create_college_record")]
    pub async fn create(&self, record: NewCollegeRecord) -> Result<CollegeRecord> {
        let id = RecordId::new();
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO college_records
                (id, name, unique_name, address, pin_code, icon, strength, mark_as_deleted, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 0, $8, $9)
            "#,
        )
        .bind(id.as_str())
        .bind(&record.name)
        .bind(&record.unique_name)
        .bind(&record.address)
        .bind(&record.pin_code)
        .bind(&record.icon)
        .bind(record.strength)
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
                    format!("College '{}' already exists", record.unique_name),
                    "college_record",
                ));
            }
            Err(err) => {
                return Err(WardenError::Database {
                    source: err,
                    context: "Failed to create college record".to_string(),
                });
            }
        }

        self.get_by_unique_name(&record.unique_name)
            .await?
            .ok_or_else(|| WardenError::internal("College record not found after creation"))
    }

    #[instrument(skip(self), name = "db_get_college_record")]
    pub async fn get_by_unique_name(&self, unique_name: &str) -> Result<Option<CollegeRecord>> {
        let row = sqlx::query_as::<_, CollegeRecordRow>(
            "SELECT * FROM college_records WHERE unique_name = $1",
        )
        .bind(unique_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| WardenError::Database {
            source: err,
            context: "Failed to fetch college record".to_string(),
        })?;

        Ok(row.map(Self::row_to_record))
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, offset = filter.offset), name = "db_list_college_records")]
    pub async fn list(&self, filter: &CollegeRecordFilter) -> Result<Vec<CollegeRecord>> {
        // Two filter axes only; enumerated queries beat a string builder here.
        let rows = match &filter.pin_code {
            Some(pin_code) => {
                sqlx::query_as::<_, CollegeRecordRow>(
                    r#"
                    SELECT * FROM college_records
                    WHERE pin_code = $1 AND (mark_as_deleted = 0 OR $2)
                    ORDER BY name LIMIT $3 OFFSET $4
                    "#,
                )
                .bind(pin_code)
                .bind(filter.include_deleted)
                .bind(filter.limit)
                .bind(filter.offset)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, CollegeRecordRow>(
                    r#"
                    SELECT * FROM college_records
                    WHERE (mark_as_deleted = 0 OR $1)
                    ORDER BY name LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(filter.include_deleted)
                .bind(filter.limit)
                .bind(filter.offset)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|err| WardenError::Database {
            source: err,
            context: "Failed to list college records".to_string(),
        })?;

        Ok(rows.into_iter().map(Self::row_to_record).collect())
    }

    #[instrument(skip(self, update), name = "db_update_college_record")]
    pub async fn update(
        &self,
        unique_name: &str,
        update: UpdateCollegeRecord,
    ) -> Result<CollegeRecord> {
        let current = self
            .get_by_unique_name(unique_name)
            .await?
            .ok_or_else(|| WardenError::not_found("college_record", unique_name))?;

        let name = update.name.unwrap_or(current.name);
        let address = update.address.unwrap_or(current.address);
        let pin_code = update.pin_code.unwrap_or(current.pin_code);
        let icon = update.icon.unwrap_or(current.icon);
        let strength = update.strength.unwrap_or(current.strength);

        sqlx::query(
            r#"
            UPDATE college_records
            SET name = $1, address = $2, pin_code = $3, icon = $4, strength = $5, updated_at = $6
            WHERE unique_name = $7
            "#,
        )
        .bind(&name)
        .bind(&address)
        .bind(&pin_code)
        .bind(&icon)
        .bind(strength)
        .bind(Utc::now())
        .bind(unique_name)
        .execute(&self.pool)
        .await
        .map_err(|err| WardenError::Database {
            source: err,
            context: "Failed to update college record".to_string(),
        })?;

        self.get_by_unique_name(unique_name)
            .await?
            .ok_or_else(|| WardenError::internal("College record not found after update"))
    }

    #[instrument(skip(self), name = "db_delete_college_record")]
    pub async fn soft_delete(&self, unique_name: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE college_records SET mark_as_deleted = 1, updated_at = $1 WHERE unique_name = $2",
        )
        .bind(Utc::now())
        .bind(unique_name)
        .execute(&self.pool)
        .await
        .map_err(|err| WardenError::Database {
            source: err,
            context: "Failed to delete college record".to_string(),
        })?;

        if result.rows_affected() == 0 {
            return Err(WardenError::not_found("college_record", unique_name));
        }

        Ok(())
    }
}
