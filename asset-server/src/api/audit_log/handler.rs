//! Audit Log API Handlers

use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::core::ServerState;
use crate::services::ServiceError;
use crate::utils::{ApiResponse, AppError, AppResult};
use shared::models::{AuditLog, EntityType};

#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

/// GET /api/audit-logs?limit=N - 最近的审计日志（新的在前）
pub async fn list_recent(
    State(state): State<ServerState>,
    Query(query): Query<RecentQuery>,
) -> AppResult<ApiResponse<Vec<AuditLog>>> {
    let logs = state
        .audit
        .list_recent(query.limit)
        .await
        .map_err(|e| AppError::from(ServiceError::from(e)))?;
    Ok(ApiResponse::success(logs))
}

/// GET /api/audit-logs/{entity_type}/{entity_id} - 单个实体的审计日志（新的在前）
pub async fn list_by_entity(
    State(state): State<ServerState>,
    Path((entity_type, entity_id)): Path<(String, i64)>,
) -> AppResult<ApiResponse<Vec<AuditLog>>> {
    let entity_type: EntityType = entity_type.parse()?;
    let logs = state
        .audit
        .list_by_entity(entity_type, entity_id)
        .await
        .map_err(|e| AppError::from(ServiceError::from(e)))?;
    Ok(ApiResponse::success(logs))
}
