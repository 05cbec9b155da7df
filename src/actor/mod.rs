//! Actor System for Watch Mode
//!
//! Message-passing concurrency for `dev` and `watch`:
//!
//! ```text
//! FsActor --> BuildActor --> WsActor
//! (watch)      (jobs)      (broadcast)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `fs` - File system watcher with debouncing and job routing
//! - `build` - Runs triggered jobs and picks the browser notification
//! - `ws` - WebSocket broadcast
//! - `coordinator` - Wires up and runs actors

pub mod build;
pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod ws;

pub use coordinator::Coordinator;
