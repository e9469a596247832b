use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default upstream timeout in seconds.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Compression is disabled upstream so playlist bodies arrive as plain text.
pub const DEFAULT_ACCEPT_ENCODING: &str = "identity";

/// Desktop browser identity presented to origins that block unknown clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Log filter used when `RUST_LOG` is unset.
pub const PROD_LOG_FILTER: &str = "hls_relay=info,tower_http=info";

/// `DEV_MODE` log filter: per-fetch and per-rewrite debug lines included.
pub const DEV_LOG_FILTER: &str = "hls_relay=debug,tower_http=debug";

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub is_dev: bool,
    /// Root directory served for every non-proxy GET path
    pub static_dir: PathBuf,
    /// Hard bound on each upstream fetch, connect through last body byte
    pub upstream_timeout: Duration,
    /// Value sent as `Accept-Encoding` upstream
    pub upstream_accept_encoding: String,
    /// Value sent as `User-Agent` upstream
    pub upstream_user_agent: String,
    /// Prometheus exporter port; no exporter is installed when unset
    pub metrics_port: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            is_dev: false,
            static_dir: PathBuf::from("."),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            upstream_accept_encoding: DEFAULT_ACCEPT_ENCODING.to_string(),
            upstream_user_agent: DEFAULT_USER_AGENT.to_string(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    /// Unset variables fall back to [`Config::default`]; malformed values are errors.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let defaults = Config::default();

        let is_dev = env::var("DEV_MODE")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);

        let host = env::var("HOST").unwrap_or(defaults.host);

        let port = match env::var("PORT") {
            Ok(v) => v.parse::<u16>().map_err(|e| format!("Invalid PORT '{v}': {e}"))?,
            Err(_) => defaults.port,
        };

        let static_dir = env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        let upstream_timeout = match env::var("UPSTREAM_TIMEOUT_SECS") {
            Ok(v) => {
                let secs: u64 = v
                    .parse()
                    .map_err(|e| format!("Invalid UPSTREAM_TIMEOUT_SECS '{v}': {e}"))?;
                if secs == 0 {
                    return Err("UPSTREAM_TIMEOUT_SECS must be greater than zero".into());
                }
                Duration::from_secs(secs)
            }
            Err(_) => defaults.upstream_timeout,
        };

        let upstream_accept_encoding =
            env::var("UPSTREAM_ACCEPT_ENCODING").unwrap_or(defaults.upstream_accept_encoding);
        let upstream_user_agent =
            env::var("UPSTREAM_USER_AGENT").unwrap_or(defaults.upstream_user_agent);

        let metrics_port = match env::var("METRICS_PORT") {
            Ok(v) => Some(
                v.parse::<u16>()
                    .map_err(|e| format!("Invalid METRICS_PORT '{v}': {e}"))?,
            ),
            Err(_) => None,
        };

        Ok(Config {
            host,
            port,
            is_dev,
            static_dir,
            upstream_timeout,
            upstream_accept_encoding,
            upstream_user_agent,
            metrics_port,
        })
    }

    /// Default `EnvFilter` directives, overridden by `RUST_LOG`
    pub fn default_log_filter(&self) -> &'static str {
        if self.is_dev {
            DEV_LOG_FILTER
        } else {
            PROD_LOG_FILTER
        }
    }

    /// `host:port` string the listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
