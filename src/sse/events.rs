//! SSE line and event types shared by the assembler and the dispatcher.

/// Represents a parsed SSE line
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    /// Event name declaration (e.g., "event: conversation.message.delta")
    Event(String),
    /// Data payload (e.g., "data: {\"type\":\"answer\",\"content\":\"hi\"}")
    Data(String),
    /// Empty line - terminates the pending event
    Empty,
    /// Comment or any field this client does not use (`id:`, `retry:`, ...)
    Ignored(String),
}

/// An event framed by a blank line, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawEvent {
    /// Event name; `None` when the record had no (or an empty) `event:` line
    pub event: Option<String>,
    /// Data payload, never empty for an emitted event
    pub data: String,
}

impl RawEvent {
    pub fn new(event: Option<String>, data: impl Into<String>) -> Self {
        Self {
            event: event.filter(|name| !name.is_empty()),
            data: data.into(),
        }
    }

    /// Event name, or `""` for an unnamed event
    pub fn name(&self) -> &str {
        self.event.as_deref().unwrap_or("")
    }
}

/// The externally observable result of dispatching one [`RawEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// One incremental piece of the generated answer
    MessageFragment(String),
    /// The producer reported a failure; terminal
    ErrorSignal(String),
    /// The producer finished the response; terminal
    CompletionSignal,
}

impl DispatchOutcome {
    /// Whether this outcome ends the session
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DispatchOutcome::MessageFragment(_))
    }
}
