use hls_relay::{config, server};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Config comes first so DEV_MODE can pick the default filter
    let config = config::Config::from_env();
    let default_filter = config
        .as_ref()
        .map_or(config::PROD_LOG_FILTER, |c| c.default_log_filter());

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting hls-relay v{}", env!("CARGO_PKG_VERSION"));

    let config = match config {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Running in {} mode, upstream timeout {}s, static files from {}",
        if config.is_dev { "DEV" } else { "PROD" },
        config.upstream_timeout.as_secs(),
        config.static_dir.display()
    );

    if let Err(e) = server::start(config).await {
        error!("Failed to start server: {}", e);
        std::process::exit(1);
    }
}
