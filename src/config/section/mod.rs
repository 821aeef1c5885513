//! Configuration section definitions.
//!
//! | Module   | TOML Section | Purpose                             |
//! |----------|--------------|-------------------------------------|
//! | `assets` | `[assets]`   | Asset root, cache policy, `.txt`    |
//! | `serve`  | `[serve]`    | HTTP server and hot reload          |

mod assets;
mod serve;

pub use assets::AssetsConfig;
pub use serve::ServeConfig;
