use serde::{Deserialize, Serialize};

/// Request body for the streaming chat endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    /// The user's message
    pub message: String,
}

impl ChatRequest {
    /// Create a new ChatRequest, trimming surrounding whitespace
    pub fn new(message: impl AsRef<str>) -> Self {
        Self {
            message: message.as_ref().trim().to_string(),
        }
    }

    /// Whether the request has something to send
    pub fn is_empty(&self) -> bool {
        self.message.trim().is_empty()
    }
}

/// Error body returned by the chat backend.
///
/// Used for non-success responses to the chat request and for the payload
/// of `error` events inside the stream.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    /// Short error summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
    /// Longer human-readable explanation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Parse an error body from JSON text
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    /// Best available message: `detail`, then `error`, skipping empty or null values
    pub fn message(&self) -> Option<String> {
        [&self.detail, &self.error]
            .into_iter()
            .flatten()
            .find_map(value_text)
    }
}

fn value_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null | serde_json::Value::Bool(false) => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
