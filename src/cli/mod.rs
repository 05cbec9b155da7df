//! Command-line interface module.

mod args;
pub mod run;
pub mod serve;

pub use args::{Cli, Commands};
