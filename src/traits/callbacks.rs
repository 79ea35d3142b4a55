//! Consumer-facing callback abstraction for streaming sessions.
//!
//! A session reports to exactly three receivers: answer fragments, an error,
//! or completion. Exactly one of `on_error`/`on_complete` is called per
//! session, after every `on_message` call.

use tokio::sync::mpsc;

/// Receiver of a session's outcomes.
///
/// # Example
///
/// ```ignore
/// use chatstream::traits::StreamCallbacks;
///
/// struct Printer;
///
/// impl StreamCallbacks for Printer {
///     fn on_message(&mut self, content: &str) { print!("{}", content); }
///     fn on_error(&mut self, message: &str) { eprintln!("error: {}", message); }
///     fn on_complete(&mut self) { println!(); }
/// }
/// ```
pub trait StreamCallbacks {
    /// One fragment of the answer; may be called many times
    fn on_message(&mut self, content: &str);

    /// The session failed; terminal
    fn on_error(&mut self, message: &str);

    /// The session finished or was cancelled; terminal
    fn on_complete(&mut self);
}

/// Callbacks built from three closures.
pub struct FnCallbacks<M, E, C> {
    on_message: M,
    on_error: E,
    on_complete: C,
}

impl<M, E, C> FnCallbacks<M, E, C>
where
    M: FnMut(&str),
    E: FnMut(&str),
    C: FnMut(),
{
    pub fn new(on_message: M, on_error: E, on_complete: C) -> Self {
        Self {
            on_message,
            on_error,
            on_complete,
        }
    }
}

impl<M, E, C> StreamCallbacks for FnCallbacks<M, E, C>
where
    M: FnMut(&str),
    E: FnMut(&str),
    C: FnMut(),
{
    fn on_message(&mut self, content: &str) {
        (self.on_message)(content)
    }

    fn on_error(&mut self, message: &str) {
        (self.on_error)(message)
    }

    fn on_complete(&mut self) {
        (self.on_complete)()
    }
}

/// Session outcome forwarded over a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamUpdate {
    Message(String),
    Error(String),
    Complete,
}

/// Forward outcomes to another task. A closed receiver drops updates.
impl StreamCallbacks for mpsc::UnboundedSender<StreamUpdate> {
    fn on_message(&mut self, content: &str) {
        let _ = self.send(StreamUpdate::Message(content.to_string()));
    }

    fn on_error(&mut self, message: &str) {
        let _ = self.send(StreamUpdate::Error(message.to_string()));
    }

    fn on_complete(&mut self) {
        let _ = self.send(StreamUpdate::Complete);
    }
}
