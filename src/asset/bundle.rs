//! Versioned style and script payloads.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::utils::mime::types;

use super::version;

/// Which of the two bundles a file contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleKind {
    Style,
    Script,
}

impl BundleKind {
    /// File extension of the published virtual path.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Style => "css",
            Self::Script => "js",
        }
    }

    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Style => types::CSS,
            Self::Script => types::JAVASCRIPT,
        }
    }
}

impl fmt::Display for BundleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Style => f.write_str("CSS"),
            Self::Script => f.write_str("JavaScript"),
        }
    }
}

/// One minified, versioned payload.
///
/// `content` is shared with in-flight responses, so serving a bundle never
/// copies it.
#[derive(Debug, Clone)]
pub struct Bundle {
    pub kind: BundleKind,
    /// URL path clients request, e.g. `/3f2a...9c.css`.
    pub virtual_path: String,
    pub content: Arc<[u8]>,
}

impl Bundle {
    /// Wrap minified text, deriving the virtual path from it.
    pub fn new(kind: BundleKind, minified: String, dev: bool) -> Self {
        let token = version::version(minified.as_bytes(), dev);
        Self {
            kind,
            virtual_path: version::virtual_path(kind, &token),
            content: Arc::from(minified.into_bytes()),
        }
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
