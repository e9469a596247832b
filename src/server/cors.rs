//! Permissive CORS and no-cache response headers.
//!
//! Values are exact strings (`GET, OPTIONS` keeps its space). Preflight is
//! answered on every path, with or without an `Origin` header.

use axum::{
    extract::Request,
    http::{HeaderName, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// CORS headers attached to proxy responses and preflight replies.
pub const CORS_HEADERS: [(HeaderName, &str); 3] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "*"),
];

/// Headers that stop players and intermediaries from caching live playlists.
pub const NO_CACHE_HEADERS: [(HeaderName, &str); 3] = [
    (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
    (header::PRAGMA, "no-cache"),
    (header::EXPIRES, "0"),
];

/// Axum middleware: answer every `OPTIONS` request with 200 and CORS headers.
///
/// The request never reaches a handler, so no upstream is contacted.
pub async fn preflight_middleware(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return (StatusCode::OK, CORS_HEADERS, ()).into_response();
    }

    next.run(req).await
}
