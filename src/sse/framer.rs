//! Line framing over decoded text.
//!
//! Text arrives in arbitrary fragments. The framer appends each fragment to
//! its buffer and hands out complete, newline-terminated lines; the trailing
//! partial line stays buffered until a later fragment completes it.

/// Accumulates decoded text and yields complete lines.
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: String,
    /// Byte offset of the first line not yet handed out
    cursor: usize,
}

impl LineFramer {
    /// Create a framer with an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` and return an iterator over the lines it completes.
    ///
    /// Lines are yielded without their `\n` and with one trailing `\r`
    /// removed. Lines left unread when the iterator is dropped are yielded
    /// by the next call instead.
    pub fn push(&mut self, text: &str) -> Lines<'_> {
        self.buffer.push_str(text);
        Lines { framer: self }
    }

    /// The buffered partial line
    pub fn remainder(&self) -> &str {
        &self.buffer[self.cursor..]
    }

    fn next_line(&mut self) -> Option<String> {
        let rest = &self.buffer[self.cursor..];
        let end = rest.find('\n')?;
        let line = &rest[..end];
        let line = line.strip_suffix('\r').unwrap_or(line).to_string();
        self.cursor += end + 1;
        Some(line)
    }

    fn compact(&mut self) {
        if self.cursor > 0 {
            self.buffer.drain(..self.cursor);
            self.cursor = 0;
        }
    }
}

/// Lazy iterator over the complete lines currently buffered.
#[derive(Debug)]
pub struct Lines<'a> {
    framer: &'a mut LineFramer,
}

impl Iterator for Lines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.framer.next_line()
    }
}

impl Drop for Lines<'_> {
    fn drop(&mut self) {
        self.framer.compact();
    }
}
