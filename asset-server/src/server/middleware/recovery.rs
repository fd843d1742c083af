//! Panic 恢复
//!
//! Used with `CatchPanicLayer::custom`: logs the panic payload and answers
//! with the standard error envelope.

use std::any::Any;

use axum::response::{IntoResponse, Response};
use shared::error::{AppError, ErrorCode};

pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(panic = %detail, "Handler panicked");

    AppError::new(ErrorCode::InternalError).into_response()
}
