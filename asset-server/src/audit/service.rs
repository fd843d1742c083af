//! 审计日志服务
//!
//! Thin orchestration over [`AuditLogStore`]: stamps the record with the
//! current time and appends it. No business validation happens here.

use std::sync::Arc;

use shared::models::{AuditAction, AuditLog, AuditLogCreate, EntityType};
use shared::util::now_millis;

use crate::db::repository::{AuditLogStore, RepoResult};

/// Default page size for [`AuditService::list_recent`]
pub const DEFAULT_LIST_LIMIT: i64 = 50;
/// Upper bound for [`AuditService::list_recent`]
pub const MAX_LIST_LIMIT: i64 = 500;

/// One mutation to be recorded
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub entity_type: EntityType,
    pub entity_id: i64,
    pub action: AuditAction,
    pub actor: Option<String>,
    /// Change document built by [`super::diff`]
    pub changes: serde_json::Value,
}

#[derive(Clone)]
pub struct AuditService {
    store: Arc<dyn AuditLogStore>,
}

impl std::fmt::Debug for AuditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditService").finish_non_exhaustive()
    }
}

impl AuditService {
    pub fn new(store: Arc<dyn AuditLogStore>) -> Self {
        Self { store }
    }

    /// Append one audit record, returning its id
    pub async fn record(&self, entry: AuditEntry) -> RepoResult<i64> {
        let record = AuditLogCreate {
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            action: entry.action,
            actor: entry.actor,
            changes: entry.changes,
            created_at: now_millis(),
        };
        self.store.append(record).await
    }

    /// Record a mutation that has already been committed
    ///
    /// A failed write is logged and swallowed: the mutation stands and the
    /// caller still reports success.
    pub async fn record_after_commit(&self, entry: AuditEntry) -> Option<i64> {
        let (entity_type, entity_id, action) = (entry.entity_type, entry.entity_id, entry.action);
        match self.record(entry).await {
            Ok(id) => {
                tracing::debug!(audit_id = id, %entity_type, entity_id, %action, "Audit record written");
                Some(id)
            }
            Err(e) => {
                tracing::error!(
                    %entity_type,
                    entity_id,
                    %action,
                    error = %e,
                    "Failed to write audit record for committed mutation"
                );
                None
            }
        }
    }

    /// Audit history of one entity, newest first
    pub async fn list_by_entity(&self, entity_type: EntityType, entity_id: i64) -> RepoResult<Vec<AuditLog>> {
        self.store.list_by_entity(entity_type, entity_id).await
    }

    /// Most recent records across all entities; `limit` is clamped to 1..=500
    pub async fn list_recent(&self, limit: Option<i64>) -> RepoResult<Vec<AuditLog>> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
        self.store.list_recent(limit).await
    }
}
