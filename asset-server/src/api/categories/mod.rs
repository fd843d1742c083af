//! Asset Category API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/categories", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/next-code", get(handler::next_code))
        .route(
            "/{id}",
            get(handler::get_by_id).put(handler::update).delete(handler::delete),
        )
}
