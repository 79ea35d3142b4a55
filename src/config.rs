//! Client configuration.
//!
//! Defaults target a local backend; environment variables override them and
//! CLI flags override the environment.

use std::time::Duration;

use thiserror::Error;

use crate::sse::EventMarkers;

/// Default backend base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Default path of the streaming chat endpoint
pub const DEFAULT_CHAT_PATH: &str = "/api/v1/coze/chat";

/// Default connect and idle timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const ENV_API_BASE: &str = "CHATSTREAM_API_BASE";
pub const ENV_CHAT_PATH: &str = "CHATSTREAM_CHAT_PATH";
pub const ENV_TIMEOUT_SECS: &str = "CHATSTREAM_TIMEOUT_SECS";

/// Invalid configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a positive number of seconds, got '{value}'")]
    InvalidTimeout { name: String, value: String },

    #[error("{name} must not be empty")]
    Empty { name: String },
}

/// Configuration for the chat client.
///
/// # Example
///
/// ```ignore
/// use chatstream::config::ChatConfig;
///
/// let config = ChatConfig::from_env()?
///     .with_api_base("http://127.0.0.1:9000")
///     .with_timeout_secs(30);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Backend base URL, without the endpoint path
    pub api_base: String,
    /// Path of the streaming chat endpoint
    pub chat_path: String,
    /// Longest wait to connect, for the response, or between body chunks
    /// (default: 60). Total stream duration is unbounded.
    pub timeout_secs: u64,
    /// Event names recognized in the stream
    pub markers: EventMarkers,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            chat_path: DEFAULT_CHAT_PATH.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            markers: EventMarkers::default(),
        }
    }
}

impl ChatConfig {
    /// Create a new ChatConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `CHATSTREAM_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env(|name| std::env::var(name).ok())
    }

    fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup(ENV_API_BASE) {
            self.api_base = non_empty(ENV_API_BASE, base)?;
        }
        if let Some(path) = lookup(ENV_CHAT_PATH) {
            self.chat_path = non_empty(ENV_CHAT_PATH, path)?;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = parse_timeout(ENV_TIMEOUT_SECS, &timeout)?;
        }
        Ok(self)
    }

    /// Set the backend base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the chat endpoint path.
    pub fn with_chat_path(mut self, chat_path: impl Into<String>) -> Self {
        self.chat_path = chat_path.into();
        self
    }

    /// Set the connect and idle timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the recognized event names.
    pub fn with_markers(mut self, markers: EventMarkers) -> Self {
        self.markers = markers;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full URL of the chat endpoint
    pub fn chat_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            self.chat_path.trim_start_matches('/')
        )
    }
}

/// Parse a timeout given in whole seconds.
pub fn parse_timeout(name: &str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::InvalidTimeout {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

fn non_empty(name: &str, value: String) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::Empty {
            name: name.to_string(),
        })
    } else {
        Ok(value.trim().to_string())
    }
}
