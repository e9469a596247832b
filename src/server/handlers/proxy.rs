use crate::{
    error::{RelayError, Result},
    hls::{is_playlist, rewriter::rewrite_playlist_bytes},
    metrics,
    server::{
        cors::{CORS_HEADERS, NO_CACHE_HEADERS},
        state::AppState,
        url_validation::validate_target_url,
    },
    upstream,
};
use axum::{
    body::{Body, Bytes},
    extract::{RawQuery, State},
    http::{HeaderValue, StatusCode, header},
    response::Response,
};
use std::time::Instant;
use tracing::info;
use url::form_urlencoded;

/// Pull the decoded `url` parameter out of a raw query string.
///
/// The first `url` pair wins. A present-but-empty value counts as missing.
pub fn target_url_from_query(query: Option<&str>) -> Result<String> {
    query
        .into_iter()
        .flat_map(|q| form_urlencoded::parse(q.as_bytes()))
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| RelayError::BadRequest("Missing 'url' parameter".to_string()))
}

/// Fetch `?url=` upstream and relay it, rewriting HLS playlists so every
/// reference inside routes back through `/proxy`.
///
/// Non-playlist bodies (segments, keys, subtitles) pass through byte-for-byte.
pub async fn serve_proxy(
    RawQuery(query): RawQuery,
    State(state): State<AppState>,
) -> Result<Response> {
    let start = Instant::now();

    let target_url = target_url_from_query(query.as_deref())?;
    validate_target_url(&target_url)?;

    info!("Proxying request to: {}", target_url);

    let upstream = match upstream::fetch(&state.http_client, &target_url, &state.config).await {
        Ok(upstream) => upstream,
        Err(e) => {
            metrics::record_upstream_error();
            metrics::record_request("error", e.status().as_u16());
            metrics::record_duration("error", start);
            return Err(e);
        }
    };

    let (kind, body) = if is_playlist(&upstream.content_type_str(), &target_url) {
        metrics::record_playlist_rewrite();
        let rewritten = rewrite_playlist_bytes(&upstream.body, &target_url);
        ("playlist", Bytes::from(rewritten))
    } else {
        ("passthrough", upstream.body)
    };

    let response = proxy_response(upstream.content_type, body)?;

    info!("Successfully proxied {} bytes", content_length(&response));
    metrics::record_request(kind, 200);
    metrics::record_duration(kind, start);

    Ok(response)
}

/// Assemble the 200 response. `Content-Type` is the upstream value
/// byte-for-byte; `Content-Length` always reflects `body`.
fn proxy_response(content_type: HeaderValue, body: Bytes) -> Result<Response> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, body.len());

    for (name, value) in CORS_HEADERS.into_iter().chain(NO_CACHE_HEADERS) {
        builder = builder.header(name, value);
    }

    builder
        .body(Body::from(body))
        .map_err(|e| RelayError::InternalError(format!("Failed to build response: {e}")))
}

fn content_length(response: &Response) -> &str {
    response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("0")
}
