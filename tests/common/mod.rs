//! Common test utilities for integration tests.
//!
//! Provides a recording implementation of `StreamCallbacks` and helpers for
//! building SSE bodies.

#![allow(dead_code)]

use chatstream::session::CancelHandle;
use chatstream::traits::{StreamCallbacks, StreamUpdate};

/// Records every callback in order.
///
/// Optionally cancels a session once a given number of fragments arrived.
#[derive(Default)]
pub struct RecordingCallbacks {
    pub updates: Vec<StreamUpdate>,
    cancel_after: Option<(usize, CancelHandle)>,
}

impl RecordingCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel `handle` right after the `n`th fragment is received.
    pub fn cancelling_after(n: usize, handle: CancelHandle) -> Self {
        Self {
            updates: Vec::new(),
            cancel_after: Some((n, handle)),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.updates
            .iter()
            .filter_map(|u| match u {
                StreamUpdate::Message(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of `on_error` plus `on_complete` calls
    pub fn terminal_count(&self) -> usize {
        self.updates
            .iter()
            .filter(|u| !matches!(u, StreamUpdate::Message(_)))
            .count()
    }
}

impl StreamCallbacks for RecordingCallbacks {
    fn on_message(&mut self, content: &str) {
        self.updates.push(StreamUpdate::Message(content.to_string()));
        if let Some((n, handle)) = &self.cancel_after {
            if self.messages().len() >= *n {
                handle.cancel();
            }
        }
    }

    fn on_error(&mut self, message: &str) {
        self.updates.push(StreamUpdate::Error(message.to_string()));
    }

    fn on_complete(&mut self) {
        self.updates.push(StreamUpdate::Complete);
    }
}

/// One delta event carrying an answer fragment.
pub fn delta(content: &str) -> String {
    let payload = serde_json::json!({ "type": "answer", "content": content });
    format!("event: conversation.message.delta\ndata: {}\n\n", payload)
}

pub fn done() -> String {
    "event: done\ndata: {}\n\n".to_string()
}

/// Serve one request with a chunked `text/event-stream` body, sleeping `gap`
/// before each chunk. Returns the base URL.
pub async fn spawn_paced_sse_server(chunks: Vec<String>, gap: std::time::Duration) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("No local address");

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };

        // Read the request head and its Content-Length body
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        let head_end = loop {
            let n = socket.read(&mut buf).await.unwrap_or(0);
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
            if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&request[..head_end]).to_lowercase();
        let content_length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while request.len() < head_end + content_length {
            let n = socket.read(&mut buf).await.unwrap_or(0);
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let head = "HTTP/1.1 200 OK\r\n\
                    Content-Type: text/event-stream\r\n\
                    Transfer-Encoding: chunked\r\n\
                    Connection: close\r\n\r\n";
        if socket.write_all(head.as_bytes()).await.is_err() {
            return;
        }
        for chunk in chunks {
            tokio::time::sleep(gap).await;
            let framed = format!("{:x}\r\n{}\r\n", chunk.len(), chunk);
            if socket.write_all(framed.as_bytes()).await.is_err() {
                return;
            }
            let _ = socket.flush().await;
        }
        let _ = socket.write_all(b"0\r\n\r\n").await;
        let _ = socket.shutdown().await;
    });

    format!("http://{}", addr)
}
