//! Live reload message protocol.
//!
//! ```text
//! {"type":"connected"}
//! {"type":"reload","reason":"html rebuilt"}
//! {"type":"css","path":"/css/main.min.css"}
//! ```

use serde::{Deserialize, Serialize};

/// Message sent over the WebSocket to browser clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReloadMessage {
    /// Connection established
    Connected,
    /// Full page reload
    Reload { reason: String },
    /// Re-fetch stylesheets whose URL path equals `path`
    Css { path: String },
}

impl ReloadMessage {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"reload"}"#.to_string())
    }
}
