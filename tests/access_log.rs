//! Access-log coverage: captures tracing output while driving the router.
//!
//! Proxy requests must not produce access-log lines; every other path does.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use hls_relay::config::Config;
use hls_relay::hls::proxy_invocation;
use hls_relay::server::build_router;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// In-memory log sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn lines(&self) -> Vec<String> {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf)
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn test_config() -> Config {
    Config {
        port: 0,
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")),
        upstream_timeout: Duration::from_secs(2),
        ..Config::default()
    }
}

async fn status_of(uri: &str) -> StatusCode {
    let app = build_router(test_config()).unwrap();
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(req).await.unwrap().status()
}

#[tokio::test]
async fn proxy_requests_are_excluded_from_access_log() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "video/MP2T")
                .set_body_bytes(vec![0x47, 0x00]),
        )
        .mount(&upstream)
        .await;

    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let target = format!("{}/seg0.ts", upstream.uri());
    assert_eq!(status_of(&proxy_invocation(&target)).await, StatusCode::OK);
    assert_eq!(status_of("/Cargo.toml").await, StatusCode::OK);

    let lines = logs.lines();
    // The proxy handler still logs its own fetch lines
    assert!(
        lines.iter().any(|l| l.contains("Proxying request to:")),
        "captured: {lines:#?}"
    );
    assert!(
        !lines.iter().any(|l| l.contains("GET /proxy")),
        "captured: {lines:#?}"
    );
    assert!(
        lines.iter().any(|l| l.contains("GET /Cargo.toml 200")),
        "captured: {lines:#?}"
    );
}
