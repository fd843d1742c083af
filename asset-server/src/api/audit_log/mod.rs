//! Audit Log API 模块
//!
//! Read-only: audit entries are written by the entity services, never over HTTP.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/audit-logs", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_recent))
        .route("/{entity_type}/{entity_id}", get(handler::list_by_entity))
}
