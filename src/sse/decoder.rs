//! Incremental UTF-8 decoding of raw response chunks.
//!
//! A chunk boundary can fall inside a multi-byte character. The decoder keeps
//! the incomplete tail and prefixes it to the next chunk, so concatenating
//! every returned fragment reproduces the text of the whole byte stream.

use std::char::REPLACEMENT_CHARACTER;

/// Stateful byte-to-text decoder for one stream.
#[derive(Debug, Default)]
pub struct ChunkDecoder {
    /// Bytes of a code point that has not been completed yet (at most 3)
    carry: Vec<u8>,
}

impl ChunkDecoder {
    /// Create a decoder with an empty carry-over buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a chunk, returning all text that is complete so far.
    ///
    /// A trailing incomplete sequence is buffered for the next call. Bytes
    /// that can never form a valid sequence are replaced with U+FFFD.
    pub fn feed(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.carry);
        bytes.extend_from_slice(chunk);

        let mut text = String::with_capacity(bytes.len());
        let mut rest: &[u8] = &bytes;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    text.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, tail) = rest.split_at(err.valid_up_to());
                    // `valid_up_to` guarantees the prefix decodes
                    if let Ok(prefix) = std::str::from_utf8(valid) {
                        text.push_str(prefix);
                    }

                    match err.error_len() {
                        Some(bad) => {
                            text.push(REPLACEMENT_CHARACTER);
                            rest = &tail[bad..];
                        }
                        None => {
                            // Incomplete sequence at the end of input
                            self.carry = tail.to_vec();
                            break;
                        }
                    }
                }
            }
        }

        text
    }

    /// Number of bytes waiting for the rest of their code point
    pub fn pending_len(&self) -> usize {
        self.carry.len()
    }
}
