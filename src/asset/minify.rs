//! Bundle minification.
//!
//! Uses oxc for JavaScript and lightningcss for CSS. Both are deterministic:
//! identical input always produces identical output, which keeps the
//! content-addressed bundle paths stable across passes.

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier as OxcMinifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use super::{BundleKind, MinifyError};

/// A minifier for one content type.
pub type MinifyFn = fn(&str) -> Result<String, MinifyError>;

/// Minifier registry: one function per bundle kind.
#[derive(Debug, Clone, Copy)]
pub struct Minifier {
    style: MinifyFn,
    script: MinifyFn,
}

impl Default for Minifier {
    fn default() -> Self {
        Self {
            style: minify_css,
            script: minify_js,
        }
    }
}

impl Minifier {
    /// Minify `source` with the function registered for `kind`.
    pub fn minify(&self, kind: BundleKind, source: &str) -> Result<String, MinifyError> {
        match kind {
            BundleKind::Style => (self.style)(source),
            BundleKind::Script => (self.script)(source),
        }
    }
}

/// Minify JavaScript source code.
///
/// Bundled files are classic browser scripts sharing one global scope, so
/// the source is parsed as a script, not a module. Top-level declarations
/// are globals that markup and other scripts may call: the compressor keeps
/// them in script mode and the mangler never renames them.
pub fn minify_js(source: &str) -> Result<String, MinifyError> {
    let allocator = Allocator::default();
    // `SourceType::default()` is an ES module
    let source_type = SourceType::script();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if let Some(error) = ret.errors.first() {
        return Err(MinifyError::new(BundleKind::Script, error.to_string()));
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions {
            top_level: Some(false),
            ..MangleOptions::default()
        }),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = OxcMinifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Result<String, MinifyError> {
    let mut stylesheet =
        StyleSheet::parse(source, ParserOptions::default()).map_err(style_error)?;
    stylesheet
        .minify(MinifyOptions::default())
        .map_err(style_error)?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(style_error)?;
    Ok(result.code)
}

fn style_error(error: impl std::fmt::Display) -> MinifyError {
    MinifyError::new(BundleKind::Style, error.to_string())
}
