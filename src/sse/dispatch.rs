//! Interpretation of assembled events.
//!
//! Each [`RawEvent`] maps to at most one [`DispatchOutcome`] by its event
//! name and data. Malformed delta payloads are dropped here and never reach
//! the consumer.

use tracing::debug;

use crate::models::ErrorBody;
use crate::sse::events::{DispatchOutcome, RawEvent};
use crate::sse::payloads::MessageDeltaPayload;

/// Data payload that completes a stream regardless of the event name
pub const DONE_SENTINEL: &str = "[DONE]";

/// Event names the dispatcher recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMarkers {
    /// Terminal event carrying failure text
    pub error: String,
    /// Terminal event marking a finished response
    pub completion: String,
    /// Non-terminal event carrying one answer fragment
    pub delta: String,
    /// Value of the delta payload's `type` field for answer text
    pub answer_tag: String,
}

impl Default for EventMarkers {
    fn default() -> Self {
        Self {
            error: "error".to_string(),
            completion: "done".to_string(),
            delta: "conversation.message.delta".to_string(),
            answer_tag: "answer".to_string(),
        }
    }
}

/// Maps raw events to dispatch outcomes.
#[derive(Debug, Clone, Default)]
pub struct EventDispatcher {
    markers: EventMarkers,
}

impl EventDispatcher {
    /// Create a dispatcher with the default markers
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dispatcher with custom markers
    pub fn with_markers(markers: EventMarkers) -> Self {
        Self { markers }
    }

    /// Interpret one event. `None` means the event is ignored.
    pub fn dispatch(&self, event: &RawEvent) -> Option<DispatchOutcome> {
        let name = event.name();

        if name == self.markers.error {
            let message = ErrorBody::parse(&event.data)
                .and_then(|body| body.message())
                .unwrap_or_else(|| event.data.clone());
            return Some(DispatchOutcome::ErrorSignal(message));
        }

        if name == self.markers.completion || event.data == DONE_SENTINEL {
            return Some(DispatchOutcome::CompletionSignal);
        }

        if name == self.markers.delta {
            return self.parse_delta(&event.data);
        }

        debug!("Ignoring SSE event '{}'", name);
        None
    }

    fn parse_delta(&self, data: &str) -> Option<DispatchOutcome> {
        let payload: MessageDeltaPayload = match serde_json::from_str(data) {
            Ok(payload) => payload,
            Err(e) => {
                debug!("Dropping malformed delta payload: {}", e);
                return None;
            }
        };

        if payload.kind.as_deref() != Some(self.markers.answer_tag.as_str()) {
            return None;
        }

        payload
            .content
            .filter(|content| !content.is_empty())
            .map(DispatchOutcome::MessageFragment)
    }
}
