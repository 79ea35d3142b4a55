//! Payload structs deserialized from event data.

use serde::Deserialize;

/// Payload of a message delta event.
///
/// Both fields are optional so that shape mismatches surface as `None`
/// rather than a parse error.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MessageDeltaPayload {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}
