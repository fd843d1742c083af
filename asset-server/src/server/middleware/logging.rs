//! 请求日志中间件
//!
//! One line per finished request, emitted inside a span that carries the
//! request id, route and actor so every log from the handler shares them.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use http::HeaderMap;
use std::time::Instant;
use tracing::Instrument;

use crate::api::actor::ACTOR_HEADER;

const REQUEST_ID_HEADER: &str = "x-request-id";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// 请求日志中间件
///
/// Runs inside the request-id layer, so `x-request-id` is normally present.
/// 4xx/5xx completions are logged at `warn`.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let started = Instant::now();

    let request_id = header_str(req.headers(), REQUEST_ID_HEADER)
        .unwrap_or("-")
        .to_owned();
    let actor = header_str(req.headers(), ACTOR_HEADER).map(str::to_owned);
    let route = match req.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_owned(),
        None => req.uri().path().to_owned(),
    };

    let span = tracing::info_span!(
        "http",
        request_id = %request_id,
        method = %req.method(),
        route = %route,
        actor = actor.as_deref().unwrap_or("-"),
    );

    async move {
        let response = next.run(req).await;
        let status = response.status().as_u16();
        let latency_ms = started.elapsed().as_millis() as u64;

        match status {
            500.. => tracing::warn!(status, latency_ms, "request failed"),
            400..500 => tracing::warn!(status, latency_ms, "request rejected"),
            _ => tracing::info!(status, latency_ms, "request completed"),
        }
        response
    }
    .instrument(span)
    .await
}
