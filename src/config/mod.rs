//! Configuration management for `hotbundle.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [assets], [serve]
//! ├── error          # ConfigError
//! ├── util           # config file discovery
//! └── mod.rs         # Config (this file)
//! ```
//!
//! Every field has a default, so a missing config file is not an error.
//! CLI flags override file values.

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{AssetsConfig, ServeConfig};

use util::find_config_file;

use crate::{
    asset::{BuildOptions, Classifier},
    cli::{AssetArgs, Cli, Commands},
    debug, log,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing hotbundle.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory relative paths resolve against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Asset tree settings
    #[serde(default)]
    pub assets: AssetsConfig,

    /// HTTP server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl Config {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file; the project root is the
    /// config file's parent directory, or cwd when there is no file.
    pub fn load(cli: &Cli) -> Result<Self> {
        crate::logger::set_verbose(cli.asset_args().verbose);
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = path;
                config
            }
            None => {
                debug!("config"; "{} not found, using defaults", cli.config.display());
                Self {
                    config_path: cwd.join(&cli.config),
                    root: cwd.clone(),
                    ..Self::default()
                }
            }
        };

        config.apply_command_options(cli, &cwd);
        config.validate()?;
        debug!(
            "config"; "config {}, assets {}",
            config.config_path.display(),
            config.assets_dir().display()
        );
        Ok(config)
    }

    /// Parse configuration from TOML string, rejecting unknown fields.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let (config, ignored) = Self::parse_with_ignored(content)?;
        if let Some(field) = ignored.first() {
            return Err(ConfigError::Validation(format!("unknown field `{field}`")));
        }
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("failed to load {}", path.display()))?;

        if !ignored.is_empty() {
            log!("warning"; "ignoring unknown fields in {}: {}", path.display(), ignored.join(", "));
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Check values the HTTP layer would otherwise reject per request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cache_control = &self.assets.cache_control;
        if cache_control.trim().is_empty() {
            return Err(ConfigError::Validation(
                "assets.cache_control must not be empty".into(),
            ));
        }
        if cache_control.contains(['\r', '\n']) {
            return Err(ConfigError::Validation(format!(
                "assets.cache_control contains a line break: {cache_control:?}"
            )));
        }
        if self.serve.workers == 0 {
            return Err(ConfigError::Validation(
                "serve.workers must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Absolute asset root.
    pub fn assets_dir(&self) -> PathBuf {
        self.root.join(&self.assets.dir)
    }

    /// Pipeline inputs for this configuration.
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            classifier: Classifier::new(self.assets.text),
            ..BuildOptions::new(self.assets_dir(), self.serve.dev)
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli, cwd: &Path) {
        match &cli.command {
            Commands::Build { asset_args, .. } => {
                self.apply_asset_args(asset_args, cwd);
                // A build pass always produces production tokens.
                self.serve.dev = false;
            }
            Commands::Serve {
                asset_args,
                interface,
                port,
                dev,
                cache_control,
            } => {
                self.apply_asset_args(asset_args, cwd);
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
                Self::update_option(&mut self.serve.dev, dev.as_ref());
                Self::update_option(&mut self.assets.cache_control, cache_control.as_ref());
            }
        }
    }

    /// Apply shared asset arguments from CLI.
    ///
    /// `--dir` is relative to cwd, unlike `assets.dir` in the file.
    fn apply_asset_args(&mut self, args: &AssetArgs, cwd: &Path) {
        if let Some(dir) = &args.dir {
            self.assets.dir = cwd.join(dir);
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }
}

/// Parse a config snippet for section tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> Config {
    Config::parse(content).unwrap()
}

// ============================================================================
// tests
// ============================================================================
