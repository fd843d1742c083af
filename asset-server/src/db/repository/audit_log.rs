//! Audit Log Store
//!
//! Append-only. The schema rejects UPDATE and DELETE on `audit_log`, so this
//! module only ever inserts and reads.

use async_trait::async_trait;
use shared::models::{AuditLog, AuditLogCreate, EntityType};
use sqlx::SqlitePool;

use super::RepoResult;

const COLUMNS: &str = "id, entity_type, entity_id, action, actor, changes, created_at";

#[async_trait]
pub trait AuditLogStore: Send + Sync {
    /// Persist one record, returning its store-assigned id
    async fn append(&self, record: AuditLogCreate) -> RepoResult<i64>;
    /// Records for one entity, newest first
    async fn list_by_entity(&self, entity_type: EntityType, entity_id: i64) -> RepoResult<Vec<AuditLog>>;
    /// Most recent records across all entities, newest first
    async fn list_recent(&self, limit: i64) -> RepoResult<Vec<AuditLog>>;
}

#[derive(Clone)]
pub struct SqliteAuditLogStore {
    pool: SqlitePool,
}

impl SqliteAuditLogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogStore for SqliteAuditLogStore {
    async fn append(&self, record: AuditLogCreate) -> RepoResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO audit_log (entity_type, entity_id, action, actor, changes, created_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(record.entity_type)
        .bind(record.entity_id)
        .bind(record.action)
        .bind(&record.actor)
        .bind(record.changes.to_string())
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn list_by_entity(&self, entity_type: EntityType, entity_id: i64) -> RepoResult<Vec<AuditLog>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM audit_log WHERE entity_type = ? AND entity_id = ? ORDER BY id DESC"
        );
        let rows = sqlx::query_as::<_, AuditLog>(&sql)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_recent(&self, limit: i64) -> RepoResult<Vec<AuditLog>> {
        let sql = format!("SELECT {COLUMNS} FROM audit_log ORDER BY id DESC LIMIT ?");
        let rows = sqlx::query_as::<_, AuditLog>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
