use serde::{Deserialize, Serialize};

/// Payload shared by every recipient of a broadcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageContent {
    pub body: String,
    /// Path or reference to an attached image, resolved by the bridge.
    pub attachment: Option<String>,
}

impl MessageContent {
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            attachment: None,
        }
    }
}
