//! Streaming chat client.
//!
//! Posts a chat message to the backend and drives the response body through
//! a [`StreamSession`], reporting fragments and the terminal outcome to the
//! caller's callbacks.

use tracing::{debug, info};

use crate::adapters::ReqwestHttpClient;
use crate::config::ChatConfig;
use crate::error::StreamError;
use crate::models::ChatRequest;
use crate::session::{CancelHandle, SessionState, StreamSession};
use crate::sse::EventDispatcher;
use crate::traits::{Headers, HttpClient, HttpError, StreamCallbacks};

/// Message reported when the request has nothing to send
pub const EMPTY_MESSAGE_ERROR: &str = "Message cannot be empty";

/// Client for the streaming chat endpoint.
///
/// Generic over the transport so tests can script the response body.
pub struct ChatClient<C: HttpClient> {
    http: C,
    config: ChatConfig,
}

impl ChatClient<ReqwestHttpClient> {
    /// Create a client over reqwest using the configured timeout.
    pub fn from_config(config: ChatConfig) -> Result<Self, HttpError> {
        let http = ReqwestHttpClient::with_timeout(config.timeout())?;
        Ok(Self::new(http, config))
    }
}

impl<C: HttpClient> ChatClient<C> {
    pub fn new(http: C, config: ChatConfig) -> Self {
        Self { http, config }
    }

    /// Send a message and stream the reply into `callbacks`.
    pub async fn send_chat_message<K>(&self, request: &ChatRequest, callbacks: &mut K) -> SessionState
    where
        K: StreamCallbacks + ?Sized,
    {
        self.send_with_cancel(request, callbacks, CancelHandle::new())
            .await
    }

    /// Send a message, stopping early once `cancel` is triggered.
    ///
    /// Exactly one of `on_error`/`on_complete` is called before this returns.
    /// Cancellation, before or after the stream opens, ends in `on_complete`.
    pub async fn send_with_cancel<K>(
        &self,
        request: &ChatRequest,
        callbacks: &mut K,
        cancel: CancelHandle,
    ) -> SessionState
    where
        K: StreamCallbacks + ?Sized,
    {
        let mut session = StreamSession::with_dispatcher(EventDispatcher::with_markers(
            self.config.markers.clone(),
        ))
        .with_cancel_handle(cancel.clone());

        if request.is_empty() {
            let err = StreamError::InvalidRequest {
                message: EMPTY_MESSAGE_ERROR.to_string(),
            };
            return session.fail_open(&err, callbacks);
        }

        let body = match serde_json::to_string(request) {
            Ok(body) => body,
            Err(e) => {
                let err = StreamError::InvalidRequest {
                    message: e.to_string(),
                };
                return session.fail_open(&err, callbacks);
            }
        };

        let url = self.config.chat_url();
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());

        info!("Opening chat stream at {}", url);

        let opened = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = self.http.post_stream(&url, &body, &headers) => Some(result),
        };

        match opened {
            None => {
                debug!("Cancelled before the stream opened");
                session.abort(callbacks);
                session.state()
            }
            Some(Err(HttpError::Cancelled)) => {
                session.abort(callbacks);
                session.state()
            }
            Some(Err(e)) => session.fail_open(&StreamError::from(e), callbacks),
            Some(Ok(body)) => session.run(body, callbacks).await,
        }
    }
}
