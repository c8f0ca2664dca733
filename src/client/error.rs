use thiserror::Error;

/// The fallback shown when nothing better is known about a failure.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// A failed call to the admin REST API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The request never produced a response.
    #[error("{0}")]
    Network(String),

    /// The response body did not match the expected schema.
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// The HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

/// Picks the human-readable part of an error body: `message`, then `error`,
/// then the generic fallback.
pub fn format_error_message(body: &serde_json::Value) -> String {
    if let Some(text) = body.as_str() {
        if !text.trim().is_empty() {
            return text.to_string();
        }
    }

    ["message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(|v| v.as_str()))
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}
