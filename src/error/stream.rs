//! Streaming-related error types.
//!
//! This module defines the failures a streaming chat session can report to
//! its consumer. Malformed payloads and cancellation are not errors and have
//! no variant here.

use std::fmt;

use crate::models::ErrorBody;
use crate::traits::HttpError;

/// Stream-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError {
    /// The server answered the request with a non-success status.
    OpenFailed {
        status: u16,
        /// Server-provided detail, or a generic message
        message: String,
    },

    /// The request never reached a response (DNS, refused, TLS, bad URL).
    ConnectionFailed {
        message: String,
    },

    /// The transport gave up waiting.
    Timeout {
        message: String,
    },

    /// Reading the body failed after streaming began.
    ReadFailed {
        message: String,
    },

    /// The server sent an explicit error event.
    Backend {
        message: String,
    },

    /// The request was rejected before being sent.
    InvalidRequest {
        message: String,
    },
}

impl StreamError {
    /// Build an open failure from a non-success response body.
    ///
    /// Uses the body's `detail`/`error` field when present.
    pub fn open_failed(status: u16, body: &str) -> Self {
        let message = ErrorBody::parse(body)
            .and_then(|body| body.message())
            .unwrap_or_else(|| format!("Request failed (HTTP {})", status));
        StreamError::OpenFailed { status, message }
    }

    /// Get the message handed to the consumer's error callback.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::OpenFailed { message, .. }
            | StreamError::Backend { message }
            | StreamError::InvalidRequest { message } => message.clone(),
            StreamError::ConnectionFailed { message } => {
                format!("Could not reach the server: {}", message)
            }
            StreamError::Timeout { message } => format!("Request timed out: {}", message),
            StreamError::ReadFailed { message } => {
                format!("Connection lost while streaming: {}", message)
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::OpenFailed { .. } => "E_STREAM_OPEN",
            StreamError::ConnectionFailed { .. } => "E_STREAM_CONN",
            StreamError::Timeout { .. } => "E_STREAM_TIMEOUT",
            StreamError::ReadFailed { .. } => "E_STREAM_READ",
            StreamError::Backend { .. } => "E_STREAM_BACKEND",
            StreamError::InvalidRequest { .. } => "E_STREAM_REQUEST",
        }
    }
}

impl From<HttpError> for StreamError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ServerError { status, message } => StreamError::open_failed(status, &message),
            HttpError::Timeout(message) => StreamError::Timeout { message },
            HttpError::Io(message) => StreamError::ReadFailed { message },
            HttpError::ConnectionFailed(message)
            | HttpError::InvalidUrl(message)
            | HttpError::Other(message) => StreamError::ConnectionFailed { message },
            HttpError::Cancelled => StreamError::ConnectionFailed {
                message: HttpError::Cancelled.to_string(),
            },
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::OpenFailed { status, message } => {
                write!(f, "Stream request failed ({}): {}", status, message)
            }
            StreamError::ConnectionFailed { message } => {
                write!(f, "Stream connection failed: {}", message)
            }
            StreamError::Timeout { message } => write!(f, "Stream timeout: {}", message),
            StreamError::ReadFailed { message } => write!(f, "Stream read failed: {}", message),
            StreamError::Backend { message } => write!(f, "Backend error: {}", message),
            StreamError::InvalidRequest { message } => write!(f, "Invalid request: {}", message),
        }
    }
}

impl std::error::Error for StreamError {}
