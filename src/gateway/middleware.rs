//! Gateway 中间件

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::Instrument;

/// 全局请求计数器，用于生成 request_id
static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(1);

/// 请求日志中间件
///
/// 每个请求运行在独立的 span 中，结束时按状态码分级记录耗时
pub async fn request_logger(request: Request, next: Next) -> Response {
    let id = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let span = tracing::info_span!(
        "req",
        id,
        method = %request.method(),
        path = %request.uri().path(),
        %origin,
    );

    async move {
        let start = Instant::now();
        let response = next.run(request).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        log_completion(response.status(), latency_ms);
        response
    }
    .instrument(span)
    .await
}

fn log_completion(status: StatusCode, latency_ms: u64) {
    let status_code = status.as_u16();
    if status.is_server_error() {
        tracing::error!(status = status_code, latency_ms, "failed");
    } else if status.is_client_error() {
        tracing::warn!(status = status_code, latency_ms, "rejected");
    } else {
        tracing::info!(status = status_code, latency_ms, "done");
    }
}
