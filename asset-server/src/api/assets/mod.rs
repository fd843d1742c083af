//! Asset API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/assets", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/bulk", post(handler::create_bulk))
        .route("/bulk/{bulk_id}", get(handler::list_bulk))
        .route(
            "/{id}",
            get(handler::get_by_id).put(handler::update).delete(handler::delete),
        )
}
