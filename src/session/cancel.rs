//! Caller-owned cancellation for a streaming session.

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Handle that stops a session's read loop.
///
/// Cloning yields another handle to the same session. Cancelling after the
/// session reached a terminal state has no effect.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called on any clone
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}
