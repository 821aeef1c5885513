//! Command-line interface module.

mod args;
pub mod build;
pub mod serve;

pub use args::{AssetArgs, Cli, Commands};
