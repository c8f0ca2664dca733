use serde::{Deserialize, Serialize};

/// A response body carrying only a human-readable message.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Liveness greeting served at `/`.
pub async fn welcome() -> &'static str {
    "Welcome to the server!"
}
