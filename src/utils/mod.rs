//! Shared helpers: external commands, MIME types, path handling.

pub mod exec;
pub mod mime;
pub mod path;
pub mod plural;
