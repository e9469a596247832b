use crate::{config::Config, upstream};
use reqwest::Client;
use std::sync::Arc;

/// Read-only state shared by all handlers.
///
/// Nothing in here is mutated after startup; each request works on its
/// own upstream response.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Shared HTTP client for connection pooling
    pub http_client: Client,
}

impl AppState {
    /// Create a new AppState with the given configuration
    pub fn new(config: Config) -> reqwest::Result<Self> {
        let http_client = upstream::build_client(&config)?;

        Ok(Self {
            config: Arc::new(config),
            http_client,
        })
    }
}
