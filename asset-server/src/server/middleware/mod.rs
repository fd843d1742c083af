//! 中间件
//!
//! - [`logging_middleware`] - 请求日志
//! - [`cors_middleware`] - permissive CORS, 204 for every preflight
//! - [`handle_panic`] - `CatchPanicLayer` 响应

mod cors;
mod logging;
mod recovery;

pub use cors::cors_middleware;
pub use logging::logging_middleware;
pub use recovery::handle_panic;
