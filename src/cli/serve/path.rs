//! Request URL to lookup-key normalization.

use percent_encoding::percent_decode_str;

/// Extract the decoded path from a request URL.
///
/// Strips the query string and fragment and percent-decodes the rest, so
/// `/my%20icon.png?v=2` becomes `/my icon.png`. The result is only ever
/// used as a map key against scanned request keys, never joined onto a
/// filesystem path.
pub fn request_path(url: &str) -> String {
    let raw = url.split(['?', '#']).next().unwrap_or_default();
    let decoded = percent_decode_str(raw).decode_utf8_lossy();

    if decoded.starts_with('/') {
        decoded.into_owned()
    } else {
        format!("/{decoded}")
    }
}
