//! HLS playlist detection and reference rewriting.
//!
//! Everything in here is pure string processing with no I/O, so the
//! rewrite rules can be exercised without an upstream.

pub mod playlist;
pub mod rewriter;

pub use playlist::{HLS_CONTENT_TYPE, is_playlist};
pub use rewriter::{LineKind, PROXY_PATH, base_directory, proxy_invocation, rewrite_playlist};
