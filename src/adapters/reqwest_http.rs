//! Reqwest-based HTTP client adapter.
//!
//! This module provides the production HTTP client implementation using
//! reqwest, implementing the [`HttpClient`] trait from `crate::traits`.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, Stream};
use futures_util::StreamExt;
use std::time::Duration;

use crate::traits::{ByteStream, Headers, HttpClient, HttpError};

/// HTTP client implementation using reqwest.
///
/// # Example
///
/// ```ignore
/// use chatstream::adapters::ReqwestHttpClient;
/// use chatstream::traits::{Headers, HttpClient};
///
/// let client = ReqwestHttpClient::with_timeout(Duration::from_secs(60))?;
/// let body = client.post_stream("http://localhost:8000/api/v1/coze/chat", "{}", &Headers::new()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
    /// Longest wait for the connection, the response head, or the next
    /// body chunk. A stream may run for any total duration.
    idle_timeout: Option<Duration>,
}

impl ReqwestHttpClient {
    /// Create a new ReqwestHttpClient with default settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            idle_timeout: None,
        }
    }

    /// Create a client that gives up when connecting, waiting for the
    /// response, or waiting between body chunks takes longer than `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(Self::convert_error)?;
        Ok(Self {
            client,
            idle_timeout: Some(timeout),
        })
    }

    /// Create a new ReqwestHttpClient with a custom reqwest::Client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            idle_timeout: None,
        }
    }

    /// Get a reference to the underlying reqwest::Client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Convert reqwest error to HttpError.
    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidUrl(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    /// Convert an error raised while reading the body.
    fn convert_body_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else {
            HttpError::Io(err.to_string())
        }
    }

    /// Apply headers to a request builder.
    fn apply_headers(
        builder: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        let mut builder = builder;
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        builder
    }

    /// End `body` with a timeout error once no chunk arrives for `idle`.
    fn with_idle_timeout<S>(body: S, idle: Duration) -> ByteStream
    where
        S: Stream<Item = Result<Bytes, HttpError>> + Send + 'static,
    {
        let stream = stream::unfold(Some(Box::pin(body)), move |state| async move {
            let Some(mut body) = state else {
                return None;
            };
            match tokio::time::timeout(idle, body.next()).await {
                Ok(Some(item)) => Some((item, Some(body))),
                Ok(None) => None,
                Err(_) => Some((Err(Self::idle_error(idle)), None)),
            }
        });
        Box::pin(stream)
    }

    fn idle_error(idle: Duration) -> HttpError {
        HttpError::Timeout(format!("no data received for {}s", idle.as_secs()))
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        let builder = self.client.post(url).body(body.to_string());
        let builder = Self::apply_headers(builder, headers);

        let response = match self.idle_timeout {
            Some(idle) => tokio::time::timeout(idle, builder.send())
                .await
                .map_err(|_| Self::idle_error(idle))?,
            None => builder.send().await,
        }
        .map_err(Self::convert_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(HttpError::ServerError { status, message });
        }

        let stream = response
            .bytes_stream()
            .map(|result| result.map_err(Self::convert_body_error));

        match self.idle_timeout {
            Some(idle) => Ok(Self::with_idle_timeout(stream, idle)),
            None => Ok(Box::pin(stream)),
        }
    }
}
