//! Access logging for everything except the proxy endpoint.
//!
//! A single HLS viewer issues a proxy request per segment every few
//! seconds, so those are left to the proxy handler's own log lines.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::info;

use crate::hls::PROXY_PATH;

/// Axum middleware: one log line per non-proxy request.
pub async fn access_log_middleware(req: Request, next: Next) -> Response {
    if req.uri().path() == PROXY_PATH {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    info!(
        "{} {} {} ({}ms)",
        method,
        path,
        response.status().as_u16(),
        start.elapsed().as_millis()
    );

    response
}
