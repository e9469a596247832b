//! One-shot upstream fetch with a browser-like header set.
//!
//! There is no retry: each proxied request makes exactly one attempt,
//! bounded by the configured timeout.

use crate::{
    config::Config,
    error::{RelayError, Result},
    hls::{HLS_CONTENT_TYPE, base_directory},
};
use axum::body::Bytes;
use reqwest::{
    Client,
    header::{self, HeaderMap, HeaderValue},
};
use std::borrow::Cow;
use std::time::Duration;
use tracing::{debug, warn};

/// Sent as `Accept-Language` on every upstream request.
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9,ru;q=0.8";

/// A fully buffered upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    /// Upstream `Content-Type` exactly as sent, or the HLS type when the
    /// header is missing
    pub content_type: HeaderValue,
    pub body: Bytes,
}

impl UpstreamResponse {
    /// `Content-Type` as text. Non-ASCII bytes are kept (lossily), never
    /// mistaken for an absent header.
    pub fn content_type_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.content_type.as_bytes())
    }
}

/// Build the pooled client shared by all requests.
pub fn build_client(config: &Config) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(config.upstream_timeout)
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(10)
        .build()
}

/// Header set sent upstream for `target_url`.
///
/// `Referer` is the target's directory with a trailing `/`.
pub fn request_headers(target_url: &str, config: &Config) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, header_value(&config.upstream_user_agent)?);
    headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static(ACCEPT_LANGUAGE),
    );
    headers.insert(
        header::ACCEPT_ENCODING,
        header_value(&config.upstream_accept_encoding)?,
    );
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));

    let referer = format!("{}/", base_directory(target_url));
    headers.insert(
        header::REFERER,
        HeaderValue::from_bytes(referer.as_bytes()).map_err(|_| {
            RelayError::BadRequest(format!("Invalid 'url' parameter: {target_url}"))
        })?,
    );

    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| RelayError::InternalError(format!("Invalid upstream header '{value}': {e}")))
}

/// GET `target_url` once and buffer the whole body.
///
/// # Errors
///
/// - [`RelayError::UpstreamError`] for a non-2xx upstream status
/// - [`RelayError::UpstreamUnreachable`] for timeouts and transport failures,
///   including failures while reading the body
pub async fn fetch(client: &Client, target_url: &str, config: &Config) -> Result<UpstreamResponse> {
    let headers = request_headers(target_url, config)?;

    let response = client
        .get(target_url)
        .headers(headers)
        .timeout(config.upstream_timeout)
        .send()
        .await
        .map_err(|e| {
            warn!("URL Error for {}: {}", target_url, e);
            RelayError::from(e)
        })?;

    let status = response.status();
    if !status.is_success() {
        // hyper only records the phrase when it differs from the canonical one
        let reason = response
            .extensions()
            .get::<hyper::ext::ReasonPhrase>()
            .map(|r| String::from_utf8_lossy(r.as_bytes()).into_owned());
        warn!("HTTP Error from {}: {}", target_url, status);
        return Err(RelayError::upstream_reason(status, reason));
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or(HeaderValue::from_static(HLS_CONTENT_TYPE));

    let body = response.bytes().await.map_err(|e| {
        warn!("Body read failed for {}: {}", target_url, e);
        RelayError::from(e)
    })?;

    let upstream = UpstreamResponse { content_type, body };
    debug!(
        "Fetched {} bytes ({}) from {}",
        upstream.body.len(),
        upstream.content_type_str(),
        target_url
    );

    Ok(upstream)
}
