//! Freshness detection for copied and optimized files.

mod mtime;

pub use mtime::needs_update;
