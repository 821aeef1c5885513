//! Bundle store: one immutable pipeline snapshot, atomically swappable.
//!
//! Uses `arc-swap` for lock-free reads and atomic replacement. A handler
//! loads the current `Arc<BundleStore>` once and answers the whole request
//! from that snapshot, so it never pairs a style bundle from one pass with
//! a script bundle or file map from another.

use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;
use rustc_hash::FxHashMap;
use serde::Serialize;

use super::scan::{self, Report};
use super::{BuildError, Bundle, BundleKind, Classifier, Minifier};

/// One pass-through file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    /// Location on disk (opened per request, never cached).
    pub physical_path: PathBuf,
    /// MIME type derived from the file suffix at scan time.
    pub content_type: &'static str,
}

/// Snapshot of everything the asset server answers from.
#[derive(Debug)]
pub struct BundleStore {
    pub style: Bundle,
    pub script: Bundle,
    files: FxHashMap<String, AssetRecord>,
}

impl BundleStore {
    /// Bundle published under `path`, if any.
    pub fn bundle(&self, path: &str) -> Option<&Bundle> {
        if path == self.style.virtual_path {
            Some(&self.style)
        } else if path == self.script.virtual_path {
            Some(&self.script)
        } else {
            None
        }
    }

    /// Pass-through file registered under request key `path`.
    pub fn file(&self, path: &str) -> Option<&AssetRecord> {
        self.files.get(path)
    }

    /// Number of pass-through files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// HTML tags referencing the current bundles.
    ///
    /// Templates must render these from the live store instead of
    /// hardcoding bundle URLs: the paths change whenever content does.
    pub fn html_tags(&self) -> String {
        format!(
            "<link rel=\"stylesheet\" href=\"{}\">\n<script src=\"{}\"></script>",
            self.style.virtual_path, self.script.virtual_path
        )
    }

    pub fn summary(&self) -> StoreSummary<'_> {
        let mut files: Vec<&str> = self.files.keys().map(String::as_str).collect();
        files.sort_unstable();
        StoreSummary {
            style: &self.style.virtual_path,
            style_bytes: self.style.len(),
            script: &self.script.virtual_path,
            script_bytes: self.script.len(),
            files,
        }
    }
}

/// Serializable manifest of a store.
#[derive(Debug, Serialize)]
pub struct StoreSummary<'a> {
    pub style: &'a str,
    pub style_bytes: usize,
    pub script: &'a str,
    pub script_bytes: usize,
    pub files: Vec<&'a str>,
}

/// Inputs of one pipeline pass.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Root asset directory.
    pub root: PathBuf,
    /// Hot-reload mode: constant version token, rebuild per request.
    pub dev: bool,
    pub classifier: Classifier,
    pub minifier: Minifier,
}

impl BuildOptions {
    pub fn new(root: impl Into<PathBuf>, dev: bool) -> Self {
        Self {
            root: root.into(),
            dev,
            classifier: Classifier::default(),
            minifier: Minifier::default(),
        }
    }
}

/// Run scan → minify → version and assemble a store.
///
/// Any failing stage aborts the pass; nothing partial is returned.
pub fn build_store(options: &BuildOptions, report: Report) -> Result<BundleStore, BuildError> {
    let scanned = scan::scan(&options.root, &options.classifier, report)?;

    let style = options.minifier.minify(BundleKind::Style, &scanned.style)?;
    let script = options
        .minifier
        .minify(BundleKind::Script, &scanned.script)?;

    Ok(BundleStore {
        style: Bundle::new(BundleKind::Style, style, options.dev),
        script: Bundle::new(BundleKind::Script, script, options.dev),
        files: scanned.files,
    })
}

/// Owner of the current [`BundleStore`].
///
/// Built once by the composition root and shared with the handlers that
/// need it; nothing else can replace the published store.
#[derive(Debug)]
pub struct AssetPipeline {
    options: BuildOptions,
    current: ArcSwap<BundleStore>,
}

impl AssetPipeline {
    /// Build the initial store. Fails if the first pass fails: there is no
    /// valid store to fall back on yet.
    pub fn new(options: BuildOptions) -> Result<Self, BuildError> {
        let store = build_store(&options, Report::Full)?;
        Ok(Self {
            options,
            current: ArcSwap::from_pointee(store),
        })
    }

    /// Current snapshot.
    #[inline]
    pub fn current(&self) -> Arc<BundleStore> {
        self.current.load_full()
    }

    pub fn is_dev(&self) -> bool {
        self.options.dev
    }

    /// Run a fresh pass and publish it.
    ///
    /// On error the previous store stays current. Concurrent callers may
    /// rebuild redundantly; each publish is a single pointer swap.
    pub fn rebuild(&self) -> Result<Arc<BundleStore>, BuildError> {
        let store = Arc::new(build_store(&self.options, Report::Quiet)?);
        self.current.store(Arc::clone(&store));
        Ok(store)
    }
}
