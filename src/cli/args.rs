//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Bundle, minify, version and serve static assets
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: hotbundle.toml)
    #[arg(short = 'C', long, global = true, default_value = "hotbundle.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve bundles and static files over HTTP
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        asset_args: AssetArgs,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Hot reload: rebuild assets before every request, no cache headers
        #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        dev: Option<bool>,

        /// Cache-Control value for production responses
        #[arg(long = "cache-control")]
        cache_control: Option<String>,
    },

    /// Run one production build and print the bundle manifest
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        asset_args: AssetArgs,

        /// Print the manifest as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Shared arguments for Serve and Build commands
#[derive(clap::Args, Debug, Clone)]
pub struct AssetArgs {
    /// Asset directory (default: assets, relative to the config file)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Cli {
    pub const fn asset_args(&self) -> &AssetArgs {
        match &self.command {
            Commands::Serve { asset_args, .. } | Commands::Build { asset_args, .. } => asset_args,
        }
    }
}
