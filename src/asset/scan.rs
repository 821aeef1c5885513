//! Asset directory scanning.
//!
//! ```text
//! assets/
//! ├── favicon.ico         -> /favicon.ico   (pass-through)
//! ├── css/
//! │   ├── base.css        -> style buffer
//! │   └── theme.css       -> style buffer
//! ├── js/app.js           -> script buffer
//! └── notes.md            -> (unsupported, logged)
//! ```
//!
//! Files are visited in sorted path order, so buffer concatenation order
//! and the winner of two files mapping to the same key are deterministic.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use jwalk::{Parallelism, WalkDir};
use rustc_hash::FxHashMap;

use super::{AssetRecord, BuildError, BundleKind, Classifier, Strategy};
use crate::{debug, log};

/// Separator appended after every bundled file.
///
/// Guards against a file without a trailing newline or semicolon fusing
/// with the next one.
const SEPARATOR: &str = "\n\n";

/// How loudly a scan reports per-file diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    /// Unsupported files are logged; per-file details need --verbose.
    Full,
    /// Everything needs --verbose (hot-reload rebuilds run once per request).
    Quiet,
}

/// Result of one directory scan, before minification.
#[derive(Debug, Default)]
pub struct ScanOutput {
    /// Request key → pass-through file.
    pub files: FxHashMap<String, AssetRecord>,
    /// Concatenated raw CSS.
    pub style: String,
    /// Concatenated raw JavaScript.
    pub script: String,
}

impl ScanOutput {
    fn buffer_mut(&mut self, kind: BundleKind) -> &mut String {
        match kind {
            BundleKind::Style => &mut self.style,
            BundleKind::Script => &mut self.script,
        }
    }
}

/// Scan `root` recursively.
///
/// Any walk or read error aborts the whole scan.
pub fn scan(root: &Path, classifier: &Classifier, report: Report) -> Result<ScanOutput, BuildError> {
    let mut output = ScanOutput::default();

    for path in collect_files(root)? {
        let key = request_key(root, &path);

        match classifier.classify(&path) {
            Strategy::PassThrough { content_type } => {
                debug!("scan"; "indexing {}", key);
                output.files.insert(
                    key,
                    AssetRecord {
                        physical_path: path,
                        content_type,
                    },
                );
            }
            Strategy::Bundle(kind) => {
                debug!("scan"; "bundling {}", path.display());
                let content = fs::read_to_string(&path).map_err(|source| BuildError::Read {
                    path: path.clone(),
                    source,
                })?;
                let buffer = output.buffer_mut(kind);
                buffer.push_str(&content);
                buffer.push_str(SEPARATOR);
            }
            Strategy::Unsupported => match report {
                Report::Full => {
                    log!("scan"; "unsupported file extension in {}: {}", root.display(), path.display())
                }
                Report::Quiet => {
                    debug!("scan"; "unsupported file extension in {}: {}", root.display(), path.display())
                }
            },
        }
    }

    Ok(output)
}

/// Collect every non-directory entry under `root`, sorted by path.
fn collect_files(root: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let root_error = |source| BuildError::Root {
        root: root.to_path_buf(),
        source,
    };
    let metadata = fs::metadata(root).map_err(root_error)?;
    if !metadata.is_dir() {
        return Err(root_error(io::Error::new(
            io::ErrorKind::NotADirectory,
            "not a directory",
        )));
    }

    let mut files = Vec::new();
    // Walk on the calling thread: dev rebuilds run on busy request workers
    let walk = WalkDir::new(root)
        .skip_hidden(false)
        .parallelism(Parallelism::Serial);
    for entry in walk {
        let entry = entry.map_err(|source| BuildError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_dir() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Request key for a file: `/` + path relative to `root`, `/`-separated.
pub fn request_key(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let mut key = String::new();
    for component in rel.components() {
        if let Component::Normal(part) = component {
            key.push('/');
            key.push_str(&part.to_string_lossy());
        }
    }
    if key.is_empty() {
        key.push('/');
    }
    key
}
