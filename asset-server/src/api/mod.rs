//! API 路由模块
//!
//! - [`health`] - 健康检查
//! - [`assets`] - 资产管理接口
//! - [`categories`] - 资产分类接口
//! - [`locations`] - 位置管理接口
//! - [`audit_log`] - 审计日志查询

pub mod actor;
pub mod assets;
pub mod audit_log;
pub mod categories;
pub mod health;
pub mod locations;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue, StatusCode};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::{Config, ServerState};
use crate::server::middleware;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID generator (UUID v4)
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(assets::router())
        .merge(categories::router())
        .merge(locations::router())
        .merge(audit_log::router())
}

/// Build a fully configured application with all middleware
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    with_middleware(build_router(), &state.config)
}

/// Wrap `router` in the production middleware stack
///
/// Layers run outer → inner in the reverse of the order they are added here:
/// request id → propagate → CORS → logging → trace → panic recovery →
/// timeout → handler.
pub fn with_middleware(router: Router<ServerState>, config: &Config) -> Router<ServerState> {
    router
        // Timeout - 408 once the configured budget is exhausted
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout(),
        ))
        // Panic recovery - 500 with the standard error body
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        // Trace - span per request
        .layer(TraceLayer::new_for_http())
        // Request logging
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        // CORS - answers every preflight with 204
        .layer(axum_middleware::from_fn(middleware::cors_middleware))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER)))
        // Request ID - generated when the client sent none
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
}
