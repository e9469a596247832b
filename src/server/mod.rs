pub mod access_log;
pub mod cors;
pub mod handlers;
pub mod state;
pub mod url_validation;

use crate::{config::Config, hls::PROXY_PATH, metrics};
use axum::{Router, middleware, routing::get};
use state::AppState;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpSocket};
use tower_http::services::ServeDir;
use tracing::{error, info};

/// Build the application router.
///
/// `GET /proxy` is the relay; every other GET is served from
/// `config.static_dir`; `OPTIONS` on any path is answered by the
/// preflight middleware.
pub fn build_router(config: Config) -> reqwest::Result<Router> {
    let static_files = ServeDir::new(&config.static_dir);
    let state = AppState::new(config)?;

    let app = Router::new()
        .route(PROXY_PATH, get(handlers::proxy::serve_proxy))
        .fallback_service(static_files)
        .with_state(state)
        .layer(middleware::from_fn(cors::preflight_middleware))
        .layer(middleware::from_fn(access_log::access_log_middleware));

    Ok(app)
}

/// Bind a listener with `SO_REUSEADDR` so a restarted process can rebind
/// while old connections sit in TIME_WAIT.
pub fn bind_reusable(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(1024)
}

/// Start the Axum HTTP server
pub async fn start(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = tokio::net::lookup_host(config.bind_addr())
        .await?
        .next()
        .ok_or_else(|| format!("Could not resolve bind address {}", config.bind_addr()))?;

    let listener = match bind_reusable(addr) {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            return Err(e.into());
        }
    };

    if let Some(port) = config.metrics_port {
        metrics::install_exporter(SocketAddr::new(addr.ip(), port))?;
    }

    let app = build_router(config)?;

    info!("🚀 Proxy server running on http://{}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl+C or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
