/// Lifecycle of a streaming session.
///
/// `Open` is initial; the other states are terminal and mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Open,
    /// Completed by a completion event, the `[DONE]` sentinel, or end of stream
    Completed,
    /// Ended by an error event or a transport failure
    Errored,
    /// Cancelled by the caller; reported to the consumer as completion
    Aborted,
}

impl SessionState {
    pub fn is_open(self) -> bool {
        self == SessionState::Open
    }

    pub fn is_terminal(self) -> bool {
        !self.is_open()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Open => "open",
            SessionState::Completed => "completed",
            SessionState::Errored => "errored",
            SessionState::Aborted => "aborted",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
