//! SSE (Server-Sent Events) stream decoding
//!
//! Turns the raw bytes of a streaming chat response into dispatch outcomes.
//! SSE format consists of:
//! - `event: <name>` - event name line
//! - `data: <json>` - data payload line
//! - Empty line - signals end of event
//! - Lines starting with `:` - comments (ignored)
//!
//! # Module structure
//! - `decoder` - UTF-8 decoding with carry-over across chunks (ChunkDecoder)
//! - `framer` - Line extraction with a retained partial line (LineFramer)
//! - `parser` - Line classification and event assembly (EventAssembler)
//! - `dispatch` - Event interpretation (EventDispatcher)
//! - `events` - Shared types (SseLine, RawEvent, DispatchOutcome)
//! - `payloads` - Internal payload deserialization structs

mod decoder;
mod dispatch;
mod events;
mod framer;
mod parser;
mod payloads;

// Re-export public types
pub use decoder::ChunkDecoder;
pub use dispatch::{EventDispatcher, EventMarkers, DONE_SENTINEL};
pub use events::{DispatchOutcome, RawEvent, SseLine};
pub use framer::{LineFramer, Lines};
pub use parser::{parse_sse_line, EventAssembler};
