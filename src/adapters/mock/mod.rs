//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with scripted streaming responses

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
