//! Location API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use http::StatusCode;

use crate::api::actor::Actor;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};
use shared::models::{Location, LocationCreate, LocationUpdate};

/// GET /api/locations - 获取所有位置
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<Location>>> {
    let locations = state.locations.list().await?;
    Ok(ApiResponse::success(locations))
}

/// GET /api/locations/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Location>> {
    let location = state.locations.get(id).await?;
    Ok(ApiResponse::success(location))
}

/// POST /api/locations
pub async fn create(
    State(state): State<ServerState>,
    actor: Actor,
    Json(payload): Json<LocationCreate>,
) -> AppResult<(StatusCode, ApiResponse<Location>)> {
    let location = state.locations.create(payload, actor.into_inner()).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(location)))
}

/// PUT /api/locations/{id}
pub async fn update(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<i64>,
    Json(payload): Json<LocationUpdate>,
) -> AppResult<ApiResponse<Location>> {
    let location = state.locations.update(id, payload, actor.into_inner()).await?;
    Ok(ApiResponse::success(location))
}

/// DELETE /api/locations/{id} - 仍被资产引用时拒绝
pub async fn delete(
    State(state): State<ServerState>,
    actor: Actor,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Location>> {
    let location = state.locations.delete(id, actor.into_inner()).await?;
    Ok(ApiResponse::success(location))
}
