//! Bundle versioning for cache busting.
//!
//! In production the version token is a digest of the minified content:
//! when content changes, the URL changes, and browsers re-fetch. In dev mode
//! content changes on every request anyway, so the token is a constant and
//! the server omits `Cache-Control` instead.

use super::BundleKind;

/// Fixed token used while hot reload is active.
pub const DEV_TOKEN: &str = "output.dev";

/// Digest length in bytes (128 bits, 32 hex chars).
const DIGEST_LEN: usize = 16;

/// Compute the version token for minified bundle content.
pub fn version(minified: &[u8], dev: bool) -> String {
    if dev {
        return DEV_TOKEN.to_string();
    }
    let hash = blake3::hash(minified);
    hex::encode(&hash.as_bytes()[..DIGEST_LEN])
}

/// Published URL path for a bundle: `/<token>.<ext>`.
pub fn virtual_path(kind: BundleKind, token: &str) -> String {
    format!("/{}.{}", token, kind.extension())
}
