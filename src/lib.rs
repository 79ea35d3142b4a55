//! chatstream - incremental Server-Sent Events client for streaming chat
//!
//! Bytes from the response body flow through
//! [`ChunkDecoder`](sse::ChunkDecoder) → [`LineFramer`](sse::LineFramer) →
//! [`EventAssembler`](sse::EventAssembler) →
//! [`EventDispatcher`](sse::EventDispatcher), driven by a
//! [`StreamSession`](session::StreamSession) that reports fragments and a
//! single terminal outcome to [`StreamCallbacks`](traits::StreamCallbacks).

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod sse;
pub mod traits;
