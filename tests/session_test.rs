// Integration tests for StreamSession
// These drive whole SSE bodies through the decode/frame/assemble/dispatch
// pipeline and check what the consumer observes.

mod common;

use bytes::Bytes;
use chatstream::session::{SessionState, StreamSession};
use chatstream::sse::{EventDispatcher, EventMarkers};
use chatstream::traits::{HttpError, StreamUpdate};
use common::{delta, done, RecordingCallbacks};

/// Feed `body` split at the given byte offsets, then end the stream.
fn run_split(body: &[u8], splits: &[usize]) -> (Vec<StreamUpdate>, SessionState) {
    let mut session = StreamSession::new();
    let mut callbacks = RecordingCallbacks::new();
    let mut start = 0;
    let end = body.len();
    for &at in splits.iter().chain(std::iter::once(&end)) {
        session.feed_chunk(&body[start..at], &mut callbacks);
        start = at;
    }
    session.end_of_stream(&mut callbacks);
    (callbacks.updates, session.state())
}

fn mixed_body() -> String {
    let mut body = String::new();
    body.push_str(&delta("Grüße, "));
    body.push_str(": keep-alive comment\r\n\r\n");
    body.push_str("event: conversation.message.delta\r\ndata: {\"type\":\"answer\",\"content\":\"🦀 crab\"}\r\n\r\n");
    body.push_str("event: conversation.message.delta\ndata: {\"type\":\"verbose\",\"content\":\"skip\"}\n\n");
    body.push_str(&delta(" 日本語"));
    body.push_str(&done());
    body
}

#[test]
fn test_every_single_split_point_gives_same_outcome() {
    let body = mixed_body();
    let bytes = body.as_bytes();
    let (expected, expected_state) = run_split(bytes, &[]);

    assert_eq!(
        expected,
        vec![
            StreamUpdate::Message("Grüße, ".to_string()),
            StreamUpdate::Message("🦀 crab".to_string()),
            StreamUpdate::Message(" 日本語".to_string()),
            StreamUpdate::Complete,
        ]
    );
    assert_eq!(expected_state, SessionState::Completed);

    for at in 1..bytes.len() {
        let (updates, state) = run_split(bytes, &[at]);
        assert_eq!(updates, expected, "split at byte {}", at);
        assert_eq!(state, expected_state, "split at byte {}", at);
    }
}

#[test]
fn test_byte_at_a_time_gives_same_outcome() {
    let body = mixed_body();
    let bytes = body.as_bytes();
    let (expected, _) = run_split(bytes, &[]);

    let splits: Vec<usize> = (1..bytes.len()).collect();
    let (updates, _) = run_split(bytes, &splits);
    assert_eq!(updates, expected);
}

#[test]
fn test_split_inside_crlf_blank_line() {
    let body = "event: conversation.message.delta\r\ndata: {\"type\":\"answer\",\"content\":\"x\"}\r\n\r\n";
    let bytes = body.as_bytes();
    let blank = body.find("\r\n\r\n").unwrap();

    for at in blank..=blank + 4 {
        let (updates, _) = run_split(bytes, &[at]);
        assert_eq!(
            updates,
            vec![StreamUpdate::Message("x".to_string()), StreamUpdate::Complete],
            "split at byte {}",
            at
        );
    }
}

#[test]
fn test_end_without_terminator_completes_once() {
    let body = format!("{}{}", delta("partial"), "event: conversation.message.delta\ndata: {\"type\"");
    let (updates, state) = run_split(body.as_bytes(), &[]);

    assert_eq!(
        updates,
        vec![
            StreamUpdate::Message("partial".to_string()),
            StreamUpdate::Complete
        ]
    );
    assert_eq!(state, SessionState::Completed);
}

#[test]
fn test_event_without_blank_line_at_end_is_not_emitted() {
    let body = "event: conversation.message.delta\ndata: {\"type\":\"answer\",\"content\":\"never\"}\n";
    let (updates, _) = run_split(body.as_bytes(), &[]);
    assert_eq!(updates, vec![StreamUpdate::Complete]);
}

#[test]
fn test_not_json_delta_is_skipped() {
    let body = format!(
        "event: conversation.message.delta\ndata: not json\n\n{}",
        delta("ok")
    );
    let (updates, _) = run_split(body.as_bytes(), &[]);
    assert_eq!(
        updates,
        vec![StreamUpdate::Message("ok".to_string()), StreamUpdate::Complete]
    );
}

#[test]
fn test_empty_content_delta_is_skipped() {
    let body = format!("{}{}", delta(""), done());
    let (updates, _) = run_split(body.as_bytes(), &[]);
    assert_eq!(updates, vec![StreamUpdate::Complete]);
}

#[test]
fn test_done_sentinel_completes_without_event_name() {
    let body = format!("data: [DONE]\n\n{}", delta("after"));
    let (updates, state) = run_split(body.as_bytes(), &[]);
    assert_eq!(updates, vec![StreamUpdate::Complete]);
    assert_eq!(state, SessionState::Completed);
}

#[test]
fn test_error_then_more_bytes_reports_only_error() {
    let body = format!(
        "{}event: error\ndata: {{\"error\":\"Upstream failed\",\"detail\":\"Bot timed out\"}}\n\n{}{}",
        delta("a"),
        delta("b"),
        done()
    );
    let (updates, state) = run_split(body.as_bytes(), &[]);
    assert_eq!(
        updates,
        vec![
            StreamUpdate::Message("a".to_string()),
            StreamUpdate::Error("Bot timed out".to_string()),
        ]
    );
    assert_eq!(state, SessionState::Errored);
}

#[test]
fn test_error_event_with_plain_text_surfaces_raw_data() {
    let body = "event: error\ndata: quota exceeded\n\n";
    let (updates, _) = run_split(body.as_bytes(), &[]);
    assert_eq!(updates, vec![StreamUpdate::Error("quota exceeded".to_string())]);
}

#[test]
fn test_repeated_data_lines_keep_last() {
    let body = "event: conversation.message.delta\n\
                data: {\"type\":\"answer\",\"content\":\"first\"}\n\
                data: {\"type\":\"answer\",\"content\":\"second\"}\n\n";
    let (updates, _) = run_split(body.as_bytes(), &[]);
    assert_eq!(
        updates,
        vec![StreamUpdate::Message("second".to_string()), StreamUpdate::Complete]
    );
}

#[test]
fn test_invalid_utf8_is_replaced() {
    let mut body = b"event: conversation.message.delta\ndata: {\"type\":\"answer\",\"content\":\"a".to_vec();
    body.push(0xFF);
    body.extend_from_slice(b"b\"}\n\n");
    let (updates, _) = run_split(&body, &[]);
    assert_eq!(
        updates,
        vec![StreamUpdate::Message("a\u{FFFD}b".to_string()), StreamUpdate::Complete]
    );
}

#[test]
fn test_cancel_after_n_fragments_in_one_chunk() {
    let body: String = (0..5).map(|i| delta(&i.to_string())).collect::<String>() + &done();
    let mut session = StreamSession::new();
    let mut callbacks = RecordingCallbacks::cancelling_after(2, session.cancel_handle());

    session.feed_chunk(body.as_bytes(), &mut callbacks);
    session.end_of_stream(&mut callbacks);

    assert_eq!(
        callbacks.updates,
        vec![
            StreamUpdate::Message("0".to_string()),
            StreamUpdate::Message("1".to_string()),
            StreamUpdate::Complete,
        ]
    );
    assert_eq!(session.state(), SessionState::Aborted);
}

#[tokio::test]
async fn test_run_cancel_after_n_fragments_across_chunks() {
    let chunks: Vec<Result<Bytes, HttpError>> = (0..4)
        .map(|i| Ok(Bytes::from(delta(&format!("f{}", i)))))
        .collect();
    let source = futures::StreamExt::chain(
        futures::stream::iter(chunks),
        futures::stream::pending(),
    );
    let session = StreamSession::new();
    let mut callbacks = RecordingCallbacks::cancelling_after(3, session.cancel_handle());

    let state = session.run(source, &mut callbacks).await;

    assert_eq!(state, SessionState::Aborted);
    assert_eq!(callbacks.messages(), vec!["f0", "f1", "f2"]);
    assert_eq!(callbacks.terminal_count(), 1);
    assert_eq!(callbacks.updates.last(), Some(&StreamUpdate::Complete));
}

#[tokio::test]
async fn test_run_transport_failure_after_fragments() {
    let source = futures::stream::iter(vec![
        Ok(Bytes::from(delta("so far"))),
        Err(HttpError::Timeout("operation timed out".to_string())),
        Ok(Bytes::from(done())),
    ]);
    let mut callbacks = RecordingCallbacks::new();

    let state = StreamSession::new().run(source, &mut callbacks).await;

    assert_eq!(state, SessionState::Errored);
    assert_eq!(callbacks.messages(), vec!["so far"]);
    assert_eq!(
        callbacks.updates.last(),
        Some(&StreamUpdate::Error(
            "Request timed out: operation timed out".to_string()
        ))
    );
    assert_eq!(callbacks.terminal_count(), 1);
}

#[tokio::test]
async fn test_run_stops_reading_after_terminal_event() {
    // The source never ends; the completion event must end the session.
    let source = futures::StreamExt::chain(
        futures::stream::iter(vec![Ok::<_, HttpError>(Bytes::from(done()))]),
        futures::stream::pending(),
    );
    let mut callbacks = RecordingCallbacks::new();

    let state = StreamSession::new().run(source, &mut callbacks).await;

    assert_eq!(state, SessionState::Completed);
    assert_eq!(callbacks.updates, vec![StreamUpdate::Complete]);
}

#[test]
fn test_custom_markers() {
    let markers = EventMarkers {
        error: "failure".to_string(),
        completion: "end".to_string(),
        delta: "chunk".to_string(),
        answer_tag: "text".to_string(),
    };
    let mut session = StreamSession::with_dispatcher(EventDispatcher::with_markers(markers));
    let mut callbacks = RecordingCallbacks::new();

    session.feed_chunk(
        b"event: chunk\ndata: {\"type\":\"text\",\"content\":\"hi\"}\n\nevent: conversation.message.delta\ndata: {\"type\":\"answer\",\"content\":\"no\"}\n\nevent: end\ndata: {}\n\n",
        &mut callbacks,
    );

    assert_eq!(
        callbacks.updates,
        vec![StreamUpdate::Message("hi".to_string()), StreamUpdate::Complete]
    );
}
