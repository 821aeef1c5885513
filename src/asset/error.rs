//! Errors that abort a pipeline pass.
//!
//! A pass that fails never replaces the published store. Unsupported files
//! are not errors: the scanner logs and skips them.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::BundleKind;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("asset directory `{}` is not walkable", root.display())]
    Root {
        root: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to walk `{}`", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: jwalk::Error,
    },

    #[error("failed to read `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Minify(#[from] MinifyError),
}

/// Malformed style or script input rejected by the minifier.
#[derive(Debug, Error)]
#[error("failed to minify {kind}: {message}")]
pub struct MinifyError {
    pub kind: BundleKind,
    pub message: String,
}

impl MinifyError {
    pub fn new(kind: BundleKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BuildError::Read {
            path: PathBuf::from("assets/app.css"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("assets/app.css"));

        let err: BuildError = MinifyError::new(BundleKind::Script, "unexpected token").into();
        assert_eq!(
            err.to_string(),
            "failed to minify JavaScript: unexpected token"
        );
    }
}
