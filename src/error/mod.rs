//! Error types for chatstream.
//!
//! - [`StreamError`]: failures reported to a session's error callback
//! - [`ConfigError`]: invalid configuration from the environment or CLI
//!
//! Decoding, framing and dispatching never fail; unrecognized input is
//! skipped rather than reported.

mod stream;

pub use stream::StreamError;

pub use crate::config::ConfigError;
