//! SSE event assembly
//!
//! Folds framed lines into [`RawEvent`]s. Field lines may arrive in any
//! order and any number of times before the blank line that terminates the
//! record; a repeated field overwrites the earlier value.

use crate::sse::events::{RawEvent, SseLine};

/// Parse a single SSE line into its component type
pub fn parse_sse_line(line: &str) -> SseLine {
    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(rest) = line.strip_prefix("event:") {
        return SseLine::Event(rest.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("data:") {
        return SseLine::Data(rest.trim().to_string());
    }

    // Comments (":keep-alive") and fields we do not use
    SseLine::Ignored(line.to_string())
}

/// Stateful assembler that accumulates field lines and emits complete events
#[derive(Debug, Default)]
pub struct EventAssembler {
    /// Event name of the record being assembled
    current_event: String,
    /// Data of the record being assembled (last `data:` line wins)
    current_data: String,
}

impl EventAssembler {
    /// Create a new assembler
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a line to the assembler, returning an event when the line
    /// terminates a record that carries data.
    pub fn feed_line(&mut self, line: &str) -> Option<RawEvent> {
        match parse_sse_line(line) {
            SseLine::Event(name) => {
                self.current_event = name;
                None
            }
            SseLine::Data(data) => {
                self.current_data = data;
                None
            }
            SseLine::Empty if !self.current_data.is_empty() => {
                let event = std::mem::take(&mut self.current_event);
                let data = std::mem::take(&mut self.current_data);
                Some(RawEvent::new(Some(event), data))
            }
            // Keep-alive padding, comments and unknown fields
            SseLine::Empty | SseLine::Ignored(_) => None,
        }
    }

    /// Whether a record is partially assembled
    pub fn has_pending(&self) -> bool {
        !self.current_event.is_empty() || !self.current_data.is_empty()
    }
}
