//! One-shot production build.
//!
//! Runs the pipeline once and prints the manifest, so CI can reject
//! malformed assets and templates can look up the current bundle paths.

use crate::{
    asset::{AssetPipeline, BundleStore},
    config::Config,
    log,
    utils::plural::plural_count,
};
use anyhow::{Context, Result};

/// Build the asset store and report it.
pub fn run_build(config: &Config, json: bool) -> Result<()> {
    let pipeline = AssetPipeline::new(config.build_options())
        .with_context(|| format!("asset build failed for {}", config.assets_dir().display()))?;
    let store = pipeline.current();

    if json {
        println!("{}", manifest_json(&store)?);
    } else {
        log_store(&store);
    }
    Ok(())
}

/// Log bundle paths, sizes and the pass-through file count.
pub fn log_store(store: &BundleStore) {
    for bundle in [&store.style, &store.script] {
        if bundle.is_empty() {
            log!("assets"; "{} {} (no sources)", bundle.kind, bundle.virtual_path);
        } else {
            log!("assets"; "{} {} ({})", bundle.kind, bundle.virtual_path, plural_count(bundle.len(), "byte"));
        }
    }
    log!("assets"; "{}", plural_count(store.file_count(), "static file"));
}

fn manifest_json(store: &BundleStore) -> Result<String> {
    serde_json::to_string_pretty(&store.summary()).context("failed to serialize manifest")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::BuildOptions;
    use serde_json::Value;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.assets.dir = dir.path().to_path_buf();
        config
    }

    #[test]
    fn test_manifest_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.css"), "h1 { margin: 0 }").unwrap();
        fs::write(dir.path().join("robots.txt"), "User-agent: *").unwrap();
        fs::create_dir(dir.path().join("img")).unwrap();
        fs::write(dir.path().join("img/logo.svg"), "<svg/>").unwrap();

        let pipeline = AssetPipeline::new(BuildOptions::new(dir.path(), false)).unwrap();
        let store = pipeline.current();
        let manifest: Value = serde_json::from_str(&manifest_json(&store).unwrap()).unwrap();

        assert_eq!(manifest["style"], store.style.virtual_path.as_str());
        assert_eq!(manifest["style_bytes"], "h1{margin:0}".len());
        assert_eq!(manifest["script"], store.script.virtual_path.as_str());
        assert_eq!(manifest["script_bytes"], store.script.len());
        assert_eq!(
            manifest["files"],
            serde_json::json!(["/img/logo.svg", "/robots.txt"])
        );
    }

    #[test]
    fn test_run_build() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.js"), "window.ready = true;").unwrap();

        assert!(run_build(&config_for(&dir), false).is_ok());
        assert!(run_build(&config_for(&dir), true).is_ok());
    }

    #[test]
    fn test_run_build_rejects_malformed_assets() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.js"), "function (").unwrap();

        let err = run_build(&config_for(&dir), false).unwrap_err();
        assert!(format!("{err:#}").contains("asset build failed"));
    }
}
