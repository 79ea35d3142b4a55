//! Streaming session: drives one response body from first byte to a single
//! terminal callback.
//!
//! Each chunk runs through decode → frame → assemble → dispatch to
//! completion before the next chunk is requested. Awaiting the next chunk is
//! the only suspension point, and it is raced against the cancel handle.
//!
//! Guarantees:
//! - exactly one of `on_error`/`on_complete` per session, whatever the exit
//!   path (terminal event, end of stream, transport failure, cancellation);
//! - nothing is delivered after the terminal callback, even if the source
//!   keeps producing bytes;
//! - a partial line or event left at end of stream or on failure is
//!   discarded, never inferred into an event.

mod cancel;
mod state;

pub use cancel::CancelHandle;
pub use state::SessionState;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::error::StreamError;
use crate::sse::{ChunkDecoder, DispatchOutcome, EventAssembler, EventDispatcher, LineFramer};
use crate::traits::{HttpError, StreamCallbacks};

/// Terminal bookkeeping, kept apart from the decoding buffers so outcomes can
/// be delivered while the framer is mid-iteration.
#[derive(Debug, Default)]
struct Progress {
    state: SessionState,
    fragments: usize,
}

impl Progress {
    fn deliver<C>(&mut self, outcome: DispatchOutcome, cancel: &CancelHandle, callbacks: &mut C)
    where
        C: StreamCallbacks + ?Sized,
    {
        if self.state.is_terminal() {
            return;
        }
        if cancel.is_cancelled() {
            self.complete(SessionState::Aborted, callbacks);
            return;
        }

        match outcome {
            DispatchOutcome::MessageFragment(content) => {
                self.fragments += 1;
                callbacks.on_message(&content);
            }
            DispatchOutcome::ErrorSignal(message) => {
                self.fail(&StreamError::Backend { message }, callbacks);
            }
            DispatchOutcome::CompletionSignal => {
                self.complete(SessionState::Completed, callbacks);
            }
        }
    }

    fn complete<C>(&mut self, state: SessionState, callbacks: &mut C)
    where
        C: StreamCallbacks + ?Sized,
    {
        if self.state.is_terminal() {
            return;
        }
        self.state = state;
        info!(
            "Stream {} after {} fragment(s)",
            state, self.fragments
        );
        callbacks.on_complete();
    }

    fn fail<C>(&mut self, err: &StreamError, callbacks: &mut C)
    where
        C: StreamCallbacks + ?Sized,
    {
        if self.state.is_terminal() {
            return;
        }
        self.state = SessionState::Errored;
        warn!(
            "Stream errored [{}] after {} fragment(s): {}",
            err.error_code(),
            self.fragments,
            err
        );
        callbacks.on_error(&err.user_message());
    }
}

/// One streaming response, from open to terminal callback.
///
/// The session owns every buffer it needs; running it consumes it, so all
/// buffers are released on every exit path.
///
/// # Example
///
/// ```ignore
/// use chatstream::session::StreamSession;
///
/// let session = StreamSession::new();
/// let cancel = session.cancel_handle();
/// let state = session.run(body, &mut callbacks).await;
/// ```
#[derive(Debug, Default)]
pub struct StreamSession {
    decoder: ChunkDecoder,
    framer: LineFramer,
    assembler: EventAssembler,
    dispatcher: EventDispatcher,
    cancel: CancelHandle,
    progress: Progress,
}

impl StreamSession {
    /// Create a session with the default event markers
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session that interprets events with `dispatcher`
    pub fn with_dispatcher(dispatcher: EventDispatcher) -> Self {
        Self {
            dispatcher,
            ..Self::default()
        }
    }

    /// Use an externally created cancel handle
    pub fn with_cancel_handle(mut self, cancel: CancelHandle) -> Self {
        self.cancel = cancel;
        self
    }

    /// Handle for cancelling this session from elsewhere
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn state(&self) -> SessionState {
        self.progress.state
    }

    /// Number of fragments delivered so far
    pub fn fragments_delivered(&self) -> usize {
        self.progress.fragments
    }

    /// Drive the session over `source` until a terminal state is reached.
    pub async fn run<S, C>(mut self, source: S, callbacks: &mut C) -> SessionState
    where
        S: Stream<Item = Result<Bytes, HttpError>>,
        C: StreamCallbacks + ?Sized,
    {
        futures::pin_mut!(source);

        while self.progress.state.is_open() {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                item = source.next() => Some(item),
            };

            match next {
                None => self.abort(callbacks),
                Some(Some(Ok(chunk))) => self.feed_chunk(&chunk, callbacks),
                Some(Some(Err(HttpError::Cancelled))) => self.abort(callbacks),
                Some(Some(Err(err))) => self.fail(&StreamError::from(err), callbacks),
                Some(None) => self.end_of_stream(callbacks),
            }
        }

        self.progress.state
    }

    /// Decode, frame, assemble and dispatch one chunk.
    ///
    /// Ignored once the session is terminal.
    pub fn feed_chunk<C>(&mut self, chunk: &[u8], callbacks: &mut C)
    where
        C: StreamCallbacks + ?Sized,
    {
        if self.progress.state.is_terminal() {
            return;
        }

        let text = self.decoder.feed(chunk);
        for line in self.framer.push(&text) {
            let Some(event) = self.assembler.feed_line(&line) else {
                continue;
            };
            debug!("SSE event '{}' ({} bytes)", event.name(), event.data.len());

            if let Some(outcome) = self.dispatcher.dispatch(&event) {
                self.progress.deliver(outcome, &self.cancel, callbacks);
            }
            if self.progress.state.is_terminal() {
                break;
            }
        }
    }

    /// The source ended without an explicit terminal event.
    pub fn end_of_stream<C>(&mut self, callbacks: &mut C)
    where
        C: StreamCallbacks + ?Sized,
    {
        if self.progress.state.is_open() {
            let unterminated = self.decoder.pending_len() + self.framer.remainder().len();
            if unterminated > 0 || self.assembler.has_pending() {
                debug!(
                    "Discarding {} unterminated byte(s) at end of stream",
                    unterminated
                );
            }
        }
        self.progress.complete(SessionState::Completed, callbacks);
    }

    /// Stop the session as cancelled; reported as completion.
    pub fn abort<C>(&mut self, callbacks: &mut C)
    where
        C: StreamCallbacks + ?Sized,
    {
        self.progress.complete(SessionState::Aborted, callbacks);
    }

    /// Stop the session with an error.
    pub fn fail<C>(&mut self, err: &StreamError, callbacks: &mut C)
    where
        C: StreamCallbacks + ?Sized,
    {
        self.progress.fail(err, callbacks);
    }

    /// Report a failure to open the stream and end the session.
    pub fn fail_open<C>(mut self, err: &StreamError, callbacks: &mut C) -> SessionState
    where
        C: StreamCallbacks + ?Sized,
    {
        self.fail(err, callbacks);
        self.progress.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::StreamUpdate;
    use tokio::sync::mpsc;

    fn collect(rx: &mut mpsc::UnboundedReceiver<StreamUpdate>) -> Vec<StreamUpdate> {
        let mut updates = Vec::new();
        while let Ok(update) = rx.try_recv() {
            updates.push(update);
        }
        updates
    }

    fn chunks(parts: &[&str]) -> impl Stream<Item = Result<Bytes, HttpError>> {
        let items: Vec<Result<Bytes, HttpError>> = parts
            .iter()
            .map(|part| Ok(Bytes::from(part.to_string())))
            .collect();
        futures::stream::iter(items)
    }

    #[test]
    fn test_feed_chunk_delivers_fragment() {
        let (mut tx, mut rx) = mpsc::unbounded_channel();
        let mut session = StreamSession::new();

        session.feed_chunk(
            b"event: conversation.message.delta\ndata: {\"type\":\"answer\",\"content\":\"hi\"}\n\n",
            &mut tx,
        );

        assert_eq!(collect(&mut rx), vec![StreamUpdate::Message("hi".to_string())]);
        assert_eq!(session.state(), SessionState::Open);
        assert_eq!(session.fragments_delivered(), 1);
    }

    #[test]
    fn test_feed_chunk_after_terminal_is_ignored() {
        let (mut tx, mut rx) = mpsc::unbounded_channel();
        let mut session = StreamSession::new();

        session.feed_chunk(b"event: done\ndata: {}\n\n", &mut tx);
        session.feed_chunk(
            b"event: conversation.message.delta\ndata: {\"type\":\"answer\",\"content\":\"late\"}\n\n",
            &mut tx,
        );
        session.end_of_stream(&mut tx);

        assert_eq!(collect(&mut rx), vec![StreamUpdate::Complete]);
        assert_eq!(session.state(), SessionState::Completed);
    }

    #[test]
    fn test_events_after_terminal_in_same_chunk_are_dropped() {
        let (mut tx, mut rx) = mpsc::unbounded_channel();
        let mut session = StreamSession::new();

        session.feed_chunk(
            b"event: error\ndata: {\"detail\":\"rate limited\"}\n\nevent: done\ndata: {}\n\n",
            &mut tx,
        );

        assert_eq!(
            collect(&mut rx),
            vec![StreamUpdate::Error("rate limited".to_string())]
        );
        assert_eq!(session.state(), SessionState::Errored);
    }

    #[test]
    fn test_fail_open_reports_single_error() {
        let (mut tx, mut rx) = mpsc::unbounded_channel();
        let session = StreamSession::new();

        let state = session.fail_open(&StreamError::open_failed(500, r#"{"error":"x"}"#), &mut tx);

        assert_eq!(state, SessionState::Errored);
        assert_eq!(collect(&mut rx), vec![StreamUpdate::Error("x".to_string())]);
    }

    #[tokio::test]
    async fn test_run_end_of_stream_completes_once() {
        let (mut tx, mut rx) = mpsc::unbounded_channel();
        let state = StreamSession::new()
            .run(chunks(&["data: partial line without newline"]), &mut tx)
            .await;

        assert_eq!(state, SessionState::Completed);
        assert_eq!(collect(&mut rx), vec![StreamUpdate::Complete]);
    }

    #[tokio::test]
    async fn test_run_cancelled_before_start() {
        let (mut tx, mut rx) = mpsc::unbounded_channel();
        let session = StreamSession::new();
        session.cancel_handle().cancel();

        let state = session.run(chunks(&["data: [DONE]\n\n"]), &mut tx).await;

        assert_eq!(state, SessionState::Aborted);
        assert_eq!(collect(&mut rx), vec![StreamUpdate::Complete]);
    }

    #[tokio::test]
    async fn test_run_transport_cancelled_is_completion() {
        let (mut tx, mut rx) = mpsc::unbounded_channel();
        let source = futures::stream::iter(vec![Err(HttpError::Cancelled)]);

        let state = StreamSession::new().run(source, &mut tx).await;

        assert_eq!(state, SessionState::Aborted);
        assert_eq!(collect(&mut rx), vec![StreamUpdate::Complete]);
    }

    #[tokio::test]
    async fn test_run_read_failure_is_error() {
        let (mut tx, mut rx) = mpsc::unbounded_channel();
        let source = futures::stream::iter(vec![
            Ok(Bytes::from("event: conversation.message.delta\n")),
            Err(HttpError::Io("connection reset".to_string())),
        ]);

        let state = StreamSession::new().run(source, &mut tx).await;

        assert_eq!(state, SessionState::Errored);
        let updates = collect(&mut rx);
        assert_eq!(updates.len(), 1);
        match &updates[0] {
            StreamUpdate::Error(message) => assert!(message.contains("connection reset")),
            other => panic!("Expected error, got {:?}", other),
        }
    }
}
