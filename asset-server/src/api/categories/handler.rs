//! Asset Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use http::StatusCode;

use crate::api::actor::Actor;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};
use shared::models::{AssetCategory, AssetCategoryCreate, AssetCategoryUpdate, CategoryCode};

/// GET /api/categories - 获取所有分类
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<AssetCategory>>> {
    let categories = state.categories.list().await?;
    Ok(ApiResponse::success(categories))
}

/// GET /api/categories/next-code - 下一个自动分类编码
pub async fn next_code(State(state): State<ServerState>) -> AppResult<ApiResponse<CategoryCode>> {
    let code = state.categories.next_code().await?;
    Ok(ApiResponse::success(CategoryCode { code }))
}

/// GET /api/categories/{id} - 获取单个分类
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<AssetCategory>> {
    let category = state.categories.get(id).await?;
    Ok(ApiResponse::success(category))
}

/// POST /api/categories - 创建分类（code 为空时自动生成）
pub async fn create(
    State(state): State<ServerState>,
    actor: Actor,
    Json(payload): Json<AssetCategoryCreate>,
) -> AppResult<(StatusCode, ApiResponse<AssetCategory>)> {
    let category = state.categories.create(payload, actor.into_inner()).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(category)))
}

/// PUT /api/categories/{id} - 更新分类
pub async fn update(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<i64>,
    Json(payload): Json<AssetCategoryUpdate>,
) -> AppResult<ApiResponse<AssetCategory>> {
    let category = state.categories.update(id, payload, actor.into_inner()).await?;
    Ok(ApiResponse::success(category))
}

/// DELETE /api/categories/{id} - 删除分类（仍被资产引用时拒绝）
pub async fn delete(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<AssetCategory>> {
    let category = state.categories.delete(id, actor.into_inner()).await?;
    Ok(ApiResponse::success(category))
}
