//! Asset classification by file suffix.

use std::path::Path;

use crate::utils::mime::types;

use super::BundleKind;

/// How a scanned file is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Served byte-for-byte from disk with a fixed content type.
    PassThrough { content_type: &'static str },
    /// Concatenated into the style or script bundle and minified.
    Bundle(BundleKind),
    /// Skipped with a diagnostic.
    Unsupported,
}

/// Pass-through suffixes in priority order (first match wins).
const PASS_THROUGH: &[(&str, &str)] = &[
    (".svg", types::SVG),
    (".png", types::PNG),
    (".jpg", types::JPG),
    (".ico", types::ICO),
    (".txt", types::PLAIN),
    (".xml", types::XML),
    (".json", types::JSON),
    (".webmanifest", types::JSON),
];

/// Maps a file path to its [`Strategy`].
///
/// Matching is a case-sensitive suffix test on the file name, so
/// `logo.PNG` is unsupported while `logo.png` is passed through.
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    /// Serve `.txt` files as `text/plain` pass-through assets.
    pub text: bool,
}

impl Default for Classifier {
    fn default() -> Self {
        Self { text: true }
    }
}

impl Classifier {
    pub const fn new(text: bool) -> Self {
        Self { text }
    }

    /// Classify a file by the suffix of its name.
    pub fn classify(&self, path: &Path) -> Strategy {
        let Some(name) = path.file_name() else {
            return Strategy::Unsupported;
        };
        let name = name.to_string_lossy();

        for &(suffix, content_type) in PASS_THROUGH {
            if suffix == ".txt" && !self.text {
                continue;
            }
            if name.ends_with(suffix) {
                return Strategy::PassThrough { content_type };
            }
        }

        if name.ends_with(".css") {
            Strategy::Bundle(BundleKind::Style)
        } else if name.ends_with(".js") {
            Strategy::Bundle(BundleKind::Script)
        } else {
            Strategy::Unsupported
        }
    }
}
