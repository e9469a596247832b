//! HLS relay: a forwarding proxy that rewrites playlist references so a
//! whole stream can be consumed through a single `/proxy?url=` endpoint.

pub mod config;
pub mod error;
pub mod hls;
pub mod metrics;
pub mod server;
pub mod upstream;
