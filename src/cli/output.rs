//! Line-based rendering of a streamed answer.

use std::io::{self, Write};

use crate::traits::StreamCallbacks;

/// Writes fragments to `out` as they arrive and errors to `err`.
///
/// Output is flushed after every fragment so partial answers show up
/// immediately. Write failures (e.g. a closed pipe) are ignored.
pub struct TerminalCallbacks<O: Write, E: Write> {
    out: O,
    err: E,
    wrote_any: bool,
    error: Option<String>,
}

impl TerminalCallbacks<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> TerminalCallbacks<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            wrote_any: false,
            error: None,
        }
    }

    /// Error reported by the session, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> StreamCallbacks for TerminalCallbacks<O, E> {
    fn on_message(&mut self, content: &str) {
        self.wrote_any = true;
        let _ = self.out.write_all(content.as_bytes());
        let _ = self.out.flush();
    }

    fn on_error(&mut self, message: &str) {
        if self.wrote_any {
            let _ = writeln!(self.out);
            let _ = self.out.flush();
        }
        let _ = writeln!(self.err, "Error: {}", message);
        self.error = Some(message.to_string());
    }

    fn on_complete(&mut self) {
        if self.wrote_any {
            let _ = writeln!(self.out);
        }
        let _ = self.out.flush();
    }
}
