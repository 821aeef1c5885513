//! `[assets]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [assets]
//! dir = "assets"                              # relative to hotbundle.toml
//! cache_control = "public, max-age=15552000"  # sent verbatim outside dev mode
//! text = true                                 # serve .txt files as text/plain
//! ```

use std::path::PathBuf;

use serde::Deserialize;

/// Six months, in seconds.
pub const DEFAULT_CACHE_CONTROL: &str = "public, max-age=15552000";

/// Asset tree settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Root asset directory.
    pub dir: PathBuf,

    /// `Cache-Control` value for production responses.
    pub cache_control: String,

    /// Classify `.txt` files as pass-through.
    pub text: bool,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets"),
            cache_control: DEFAULT_CACHE_CONTROL.to_string(),
            text: true,
        }
    }
}
