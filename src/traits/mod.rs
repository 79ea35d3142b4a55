//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - Streaming HTTP transport
//! - [`StreamCallbacks`] - Consumer of a streaming session's outcomes

pub mod callbacks;
pub mod http;

pub use callbacks::{FnCallbacks, StreamCallbacks, StreamUpdate};
pub use http::{ByteStream, Headers, HttpClient, HttpError};
