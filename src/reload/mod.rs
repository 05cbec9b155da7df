//! Reload Module
//!
//! WebSocket live reload for `dev` and `watch`.
//!
//! ```text
//! BuildActor -> WsActor -> Browser
//!   (jobs)   (broadcast)  (client script)
//! ```
//!
//! # Modules
//!
//! - `client` - Script injected into served HTML pages
//! - `message` - JSON messages sent to the browser
//! - `server` - WebSocket listener handing clients to the WsActor

pub mod client;
pub mod message;
pub mod server;
