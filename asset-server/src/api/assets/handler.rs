//! Asset API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use http::StatusCode;

use crate::api::actor::Actor;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};
use shared::models::{Asset, AssetBulkCreate, AssetCreate, AssetUpdate};

/// GET /api/assets - 获取所有资产
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Asset>>> {
    let assets = state.assets.list().await?;
    Ok(ApiResponse::success(assets))
}

/// GET /api/assets/{id} - 获取单个资产
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Asset>> {
    let asset = state.assets.get(id).await?;
    Ok(ApiResponse::success(asset))
}

/// POST /api/assets - 创建资产
pub async fn create(
    State(state): State<ServerState>,
    actor: Actor,
    Json(payload): Json<AssetCreate>,
) -> AppResult<(StatusCode, ApiResponse<Asset>)> {
    let asset = state.assets.create(payload, actor.into_inner()).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(asset)))
}

/// POST /api/assets/bulk - 批量创建资产
pub async fn create_bulk(
    State(state): State<ServerState>,
    actor: Actor,
    Json(payload): Json<AssetBulkCreate>,
) -> AppResult<(StatusCode, ApiResponse<Vec<Asset>>)> {
    let assets = state.assets.create_bulk(payload, actor.into_inner()).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(assets)))
}

/// GET /api/assets/bulk/{bulk_id} - 获取同一批次的资产
pub async fn list_bulk(
    State(state): State<ServerState>,
    Path(bulk_id): Path<String>,
) -> AppResult<ApiResponse<Vec<Asset>>> {
    let assets = state.assets.list_bulk(&bulk_id).await?;
    Ok(ApiResponse::success(assets))
}

/// PUT /api/assets/{id} - 更新资产
pub async fn update(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<i64>,
    Json(payload): Json<AssetUpdate>,
) -> AppResult<ApiResponse<Asset>> {
    let asset = state.assets.update(id, payload, actor.into_inner()).await?;
    Ok(ApiResponse::success(asset))
}

/// DELETE /api/assets/{id} - 删除资产，返回删除前的记录
pub async fn delete(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Asset>> {
    let asset = state.assets.delete(id, actor.into_inner()).await?;
    Ok(ApiResponse::success(asset))
}
