//! Configuration section definitions.
//!
//! Each module corresponds to a section in `kiln.toml`:
//!
//! | Module    | TOML Section            | Purpose                              |
//! |-----------|-------------------------|--------------------------------------|
//! | `paths`   | `[paths]`, `[paths.*]`  | Path table: sources, destinations    |
//! | `assets`  | `[styles]`, `[scripts]`, `[images]` | Per-job options          |
//! | `serve`   | `[serve]`               | Live-reload server                   |

mod assets;
mod paths;
mod serve;

pub use assets::{ImagesConfig, ScriptsConfig, StylesConfig};
pub use paths::{PathEntry, PathTable, PathsConfig};
pub use serve::ServeConfig;
