//! Actor Message Definitions
//!
//! ```text
//! FsActor --Run--> BuildActor --Reload/Css--> WsActor
//! ```

use crate::core::Job;

/// Messages to Build Actor
#[derive(Debug)]
pub enum BuildMsg {
    /// Run a deduplicated batch of jobs triggered by one debounced change set
    Run { jobs: Vec<Job> },
    /// Shutdown
    Shutdown,
}

/// Messages to WebSocket Actor
#[derive(Debug)]
pub enum WsMsg {
    /// Full page reload
    Reload { reason: String },
    /// Re-fetch one stylesheet without reloading the page
    Css { path: String },
    /// Add client
    AddClient(std::net::TcpStream),
    /// Shutdown
    Shutdown,
}
