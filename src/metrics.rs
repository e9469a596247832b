//! Prometheus metrics for proxied requests.
//!
//! Recording goes through the `metrics` facade and is a no-op until
//! [`install_exporter`] has registered a recorder.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;
use tracing::info;

/// Install the Prometheus recorder with its own HTTP listener on `addr`.
///
/// Must be called from inside a tokio runtime.
pub fn install_exporter(addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    info!("Prometheus metrics exposed on http://{}/metrics", addr);
    Ok(())
}

/// Count one proxied request. `kind` is `playlist`, `passthrough` or `error`.
pub fn record_request(kind: &'static str, status: u16) {
    counter!(
        "relay_requests_total",
        "kind" => kind,
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record wall-clock time since `start` for a request of `kind`.
pub fn record_duration(kind: &'static str, start: Instant) {
    histogram!("relay_request_duration_seconds", "kind" => kind)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_error() {
    counter!("relay_upstream_errors_total").increment(1);
}

pub fn record_playlist_rewrite() {
    counter!("relay_playlists_rewritten_total").increment(1);
}
