//! Core types - pure abstractions shared across the codebase.

mod category;
mod job;
mod mode;
mod state;

pub use category::Category;
pub use job::{Job, JobReport};
pub use mode::BuildMode;
pub use state::{is_shutdown, register_server, setup_shutdown_handler};
