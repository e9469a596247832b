/// Content type assumed when upstream omits `Content-Type`, and the one
/// that marks a response as a playlist.
pub const HLS_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";

/// Decide whether an upstream response is an HLS playlist.
///
/// Origins frequently mislabel playlists (`text/plain`,
/// `application/octet-stream`), so a `.m3u8` target URL is enough on its own.
pub fn is_playlist(content_type: &str, target_url: &str) -> bool {
    content_type == HLS_CONTENT_TYPE || target_url.ends_with(".m3u8")
}
