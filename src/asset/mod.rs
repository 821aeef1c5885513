//! Asset pipeline: scan, bundle, minify, version.
//!
//! ```text
//! assets/                  scan            minify + version
//! ├── app.css    ─┐
//! ├── nav.css    ─┴─► style buffer  ──► /<hash>.css
//! ├── app.js     ───► script buffer ──► /<hash>.js
//! └── logo.png   ───► file map      ──► /logo.png (pass-through)
//! ```
//!
//! One pass produces one immutable [`BundleStore`]; [`AssetPipeline`]
//! publishes it atomically so concurrent readers never see a mix of two
//! passes.

mod bundle;
mod error;
mod kind;
mod minify;
mod scan;
mod store;
mod version;

pub use bundle::{Bundle, BundleKind};
pub use error::{BuildError, MinifyError};
pub use kind::{Classifier, Strategy};
pub use minify::Minifier;
pub use store::{AssetPipeline, AssetRecord, BuildOptions, BundleStore};
