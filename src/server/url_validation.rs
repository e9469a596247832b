use crate::error::RelayError;
use url::Url;

/// Validate that a proxy target is an absolute `http`/`https` URL with a host.
///
/// Only the shape is checked. Private and loopback addresses are allowed:
/// the relay is commonly pointed at origins on the local network.
///
/// # Errors
/// Returns [`RelayError::BadRequest`] for:
/// - Relative or unparseable URLs
/// - Non-HTTP(S) schemes
/// - URLs without a host
pub fn validate_target_url(url: &str) -> Result<(), RelayError> {
    let parsed = Url::parse(url)
        .map_err(|e| RelayError::BadRequest(format!("Invalid 'url' parameter: {url} ({e})")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(RelayError::BadRequest(format!(
                "Invalid 'url' parameter: scheme '{scheme}' not supported, only http/https"
            )));
        }
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(RelayError::BadRequest(format!(
            "Invalid 'url' parameter: no host in {url}"
        )));
    }

    Ok(())
}
