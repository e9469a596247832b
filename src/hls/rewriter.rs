use std::borrow::Cow;
use tracing::debug;

/// Path of the proxy invocation endpoint.
pub const PROXY_PATH: &str = "/proxy";

/// Classification of a single playlist line.
///
/// Classification looks at the whitespace-trimmed line; references carry
/// the trimmed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Blank line, tag (`#EXT...`) or comment. Emitted untouched.
    CommentOrBlank,
    /// `http://` or `https://` reference, proxied as-is.
    AbsoluteReference(&'a str),
    /// Reference resolved against the playlist's directory before proxying.
    RelativeReference(&'a str),
    /// Starts with `/`. Either already a proxy invocation or an
    /// origin-absolute path; both are emitted untouched.
    AlreadyProxied,
}

impl<'a> LineKind<'a> {
    /// Classify one playlist line by its whitespace-trimmed content.
    pub fn classify(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            LineKind::CommentOrBlank
        } else if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            LineKind::AbsoluteReference(trimmed)
        } else if trimmed.starts_with('/') {
            LineKind::AlreadyProxied
        } else {
            LineKind::RelativeReference(trimmed)
        }
    }
}

/// Everything before the last `/` of `url`, or all of it when there is none.
///
/// Plain string surgery, not RFC 3986 resolution: a `/` inside the query
/// string counts too.
pub fn base_directory(url: &str) -> &str {
    url.rsplit_once('/').map(|(base, _)| base).unwrap_or(url)
}

/// Build the `/proxy?url=...` string that routes `absolute_url` back through us.
///
/// Only ASCII alphanumerics and `-._~` survive unencoded, so `/`, `:`, `?`
/// and `&` inside the target never leak into our own query string.
pub fn proxy_invocation(absolute_url: &str) -> String {
    format!("{}?url={}", PROXY_PATH, urlencoding::encode(absolute_url))
}

/// Rewrite one line given the directory of the playlist it came from.
pub fn rewrite_line<'a>(line: &'a str, base: &str) -> Cow<'a, str> {
    match LineKind::classify(line) {
        LineKind::CommentOrBlank | LineKind::AlreadyProxied => Cow::Borrowed(line),
        LineKind::AbsoluteReference(url) => Cow::Owned(proxy_invocation(url)),
        LineKind::RelativeReference(reference) => {
            Cow::Owned(proxy_invocation(&format!("{}/{}", base, reference)))
        }
    }
}

/// Rewrite every URI reference line of a playlist fetched from `target_url`.
///
/// Lines are split and rejoined on `\n` only, so line order, `\r` on
/// untouched lines and the presence of a trailing newline all survive.
pub fn rewrite_playlist(body: &str, target_url: &str) -> String {
    let base = base_directory(target_url);

    let mut rewritten = 0usize;
    let lines: Vec<Cow<'_, str>> = body
        .split('\n')
        .map(|line| {
            let out = rewrite_line(line, base);
            if matches!(out, Cow::Owned(_)) {
                rewritten += 1;
            }
            out
        })
        .collect();

    debug!("Rewrote {} references in playlist from {}", rewritten, target_url);
    lines.join("\n")
}

/// Lossily decode a raw playlist body, rewrite it and re-encode it.
///
/// Invalid UTF-8 sequences become U+FFFD instead of failing the request.
pub fn rewrite_playlist_bytes(body: &[u8], target_url: &str) -> Vec<u8> {
    let text = String::from_utf8_lossy(body);
    rewrite_playlist(&text, target_url).into_bytes()
}
