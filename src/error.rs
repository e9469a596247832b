use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::error::Error as _;
use thiserror::Error;
use tracing::error;

/// Result alias used by every handler and fetch helper.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Failures surfaced to the proxy client.
///
/// Every variant is converted to an HTTP response at the handler boundary;
/// a failing request never affects the listener or any other request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Missing or malformed proxy parameter. No upstream contact was made.
    #[error("{0}")]
    BadRequest(String),

    /// Upstream answered with a non-success status, relayed as-is.
    #[error("Upstream error: {reason}")]
    UpstreamError { status: StatusCode, reason: String },

    /// DNS, TLS, connect or timeout failure talking to upstream.
    #[error("Cannot reach upstream: {0}")]
    UpstreamUnreachable(String),

    #[error("Proxy error: {0}")]
    InternalError(String),
}

impl RelayError {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::UpstreamError { status, .. } => *status,
            RelayError::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
            RelayError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build an [`RelayError::UpstreamError`] from an upstream status code,
    /// using the canonical reason phrase when one exists.
    pub fn upstream_status(status: StatusCode) -> Self {
        Self::upstream_reason(status, None)
    }

    /// Build an [`RelayError::UpstreamError`] carrying the reason phrase the
    /// upstream actually sent, falling back to the canonical one when it sent
    /// none or an empty one.
    pub fn upstream_reason(status: StatusCode, reason: Option<String>) -> Self {
        let reason = reason.filter(|r| !r.is_empty()).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown Status")
                .to_string()
        });
        RelayError::UpstreamError { status, reason }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return RelayError::upstream_status(status);
        }
        if err.is_timeout() {
            return RelayError::UpstreamUnreachable("timed out".to_string());
        }

        // reqwest's top-level message only names the URL; the cause is in the chain
        let mut reason = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            reason.push_str(": ");
            reason.push_str(&cause.to_string());
            source = cause.source();
        }
        RelayError::UpstreamUnreachable(reason)
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let RelayError::InternalError(ref detail) = self {
            error!("Proxy error: {}", detail);
        }

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}
