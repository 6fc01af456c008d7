//! End-to-end tests for the stream session over scripted transports.

use std::io;

use driftchat_client::{
    ConversationRef, PartialMessagePolicy, SessionState, StreamError, StreamHandler, StreamSession,
};
use futures::StreamExt;
use uuid::Uuid;

#[derive(Default)]
struct RecordingHandler {
    deltas: Vec<String>,
    assigned: Vec<ConversationRef>,
    completed: Vec<String>,
    errors: Vec<String>,
}

impl StreamHandler for RecordingHandler {
    fn on_delta(&mut self, text: &str) {
        self.deltas.push(text.to_string());
    }

    fn on_conversation_assigned(&mut self, conversation: &ConversationRef) {
        self.assigned.push(conversation.clone());
    }

    fn on_complete(&mut self, final_text: &str) {
        self.completed.push(final_text.to_string());
    }

    fn on_error(&mut self, error: &StreamError) {
        self.errors.push(error.to_string());
    }
}

fn ok_chunks(
    chunks: Vec<&str>,
) -> impl futures::Stream<Item = Result<Vec<u8>, io::Error>> + Unpin {
    futures::stream::iter(
        chunks
            .into_iter()
            .map(|chunk| Ok(chunk.as_bytes().to_vec()))
            .collect::<Vec<_>>(),
    )
}

fn delta_frame(content: &str) -> String {
    format!(
        "data: {{\"choices\":[{{\"delta\":{{\"content\":{}}}}}]}}\n",
        serde_json::to_string(content).unwrap()
    )
}

#[tokio::test]
async fn assembles_deltas_and_completes_on_sentinel() {
    let mut session = StreamSession::default();
    let mut handler = RecordingHandler::default();

    let stream = ok_chunks(vec![
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n",
        "data: [DONE]\n",
    ]);

    let final_text = session.consume(stream, &mut handler).await.unwrap();

    assert_eq!(final_text, "Hello");
    assert_eq!(session.state(), SessionState::Completed);
    assert!(!session.message().is_streaming());
    assert_eq!(handler.deltas, vec!["Hel", "lo"]);
    assert_eq!(handler.completed, vec!["Hello"]);
    assert!(handler.errors.is_empty());
}

#[tokio::test]
async fn arbitrary_chunk_boundaries_yield_the_same_text() {
    let transcript = format!(
        "{}{}data: [DONE]\n",
        delta_frame("Héllo, "),
        delta_frame("wörld")
    );
    let bytes = transcript.as_bytes();

    for split in 1..bytes.len() {
        let mut session = StreamSession::default();
        let mut handler = RecordingHandler::default();
        let stream = futures::stream::iter(vec![
            Ok::<_, io::Error>(bytes[..split].to_vec()),
            Ok(bytes[split..].to_vec()),
        ]);

        let final_text = session.consume(stream, &mut handler).await.unwrap();
        assert_eq!(final_text, "Héllo, wörld", "split at byte {split}");
        assert_eq!(handler.deltas.concat(), "Héllo, wörld");
    }
}

#[tokio::test]
async fn completes_on_transport_eof_without_sentinel() {
    let mut session = StreamSession::default();
    let mut handler = RecordingHandler::default();

    // Final frame lacks its newline; finish() must flush it.
    let stream = ok_chunks(vec![
        "data: {\"choices\":[{\"delta\":{\"content\":\"partial\"}}]}",
    ]);

    let final_text = session.consume(stream, &mut handler).await.unwrap();

    assert_eq!(final_text, "partial");
    assert_eq!(session.state(), SessionState::Completed);
    assert_eq!(handler.completed.len(), 1);
}

#[tokio::test]
async fn malformed_frames_are_skipped_not_fatal() {
    let mut session = StreamSession::default();
    let mut handler = RecordingHandler::default();

    let stream = ok_chunks(vec![
        "data: {not json\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n",
        "data: [DONE]\n",
    ]);

    let final_text = session.consume(stream, &mut handler).await.unwrap();

    assert_eq!(final_text, "ok");
    assert_eq!(handler.deltas, vec!["ok"]);
    assert!(handler.errors.is_empty());
}

#[tokio::test]
async fn doubled_data_prefix_is_unwrapped() {
    let mut session = StreamSession::default();
    let mut handler = RecordingHandler::default();

    let stream = ok_chunks(vec![
        "data: data: {\"choices\":[{\"delta\":{\"content\":\"inner\"}}]}\n",
        "data: [DONE]\n",
    ]);

    let final_text = session.consume(stream, &mut handler).await.unwrap();
    assert_eq!(final_text, "inner");
}

#[tokio::test]
async fn publishes_first_conversation_assignment_only() {
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let mut session = StreamSession::default();
    let mut handler = RecordingHandler::default();

    let frames = format!(
        "data: {{\"conversation_id\":\"{first}\",\"title\":\"First\"}}\n\
         {}data: {{\"conversation_id\":\"{second}\",\"title\":\"Second\"}}\n\
         data: [DONE]\n",
        delta_frame("hi")
    );
    let stream = ok_chunks(vec![&frames]);

    session.consume(stream, &mut handler).await.unwrap();

    assert_eq!(handler.assigned.len(), 1);
    assert_eq!(handler.assigned[0].id, first);
    assert_eq!(session.conversation().unwrap().id, first);
}

#[tokio::test]
async fn transport_error_fails_stream_and_keeps_partial() {
    let mut session = StreamSession::new(PartialMessagePolicy::Keep);
    let mut handler = RecordingHandler::default();

    let stream = futures::stream::iter(vec![
        Ok::<Vec<u8>, io::Error>(delta_frame("kept ").into_bytes()),
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
    ]);

    let err = session.consume(stream, &mut handler).await.unwrap_err();

    assert!(matches!(err, StreamError::Transport { .. }));
    assert_eq!(session.state(), SessionState::Failed);
    assert_eq!(session.message().content(), "kept ");
    assert!(!session.message().is_streaming());
    assert_eq!(handler.errors.len(), 1);
    assert!(handler.completed.is_empty());
}

#[tokio::test]
async fn discard_policy_drops_partial_on_failure() {
    let mut session = StreamSession::new(PartialMessagePolicy::Discard);
    let mut handler = RecordingHandler::default();

    let stream = futures::stream::iter(vec![
        Ok::<Vec<u8>, io::Error>(delta_frame("doomed").into_bytes()),
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
    ]);

    session.consume(stream, &mut handler).await.unwrap_err();

    assert_eq!(session.state(), SessionState::Failed);
    assert_eq!(session.message().content(), "");
    assert_eq!(handler.deltas, vec!["doomed"]);
}

#[tokio::test]
async fn upstream_error_frame_fails_the_stream() {
    let mut session = StreamSession::default();
    let mut handler = RecordingHandler::default();

    let frames = format!(
        "{}data: {{\"error\":{{\"message\":\"Insufficient balance\"}}}}\n",
        delta_frame("partial ")
    );
    let stream = ok_chunks(vec![&frames]);

    let err = session.consume(stream, &mut handler).await.unwrap_err();

    match err {
        StreamError::Upstream(response) => {
            assert_eq!(response.message, "Insufficient balance");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
    assert_eq!(session.state(), SessionState::Failed);
    assert_eq!(session.message().content(), "partial ");
    assert_eq!(handler.errors.len(), 1);
}

#[tokio::test]
async fn cancellation_suppresses_frames_already_in_flight() {
    let mut session = StreamSession::default();
    let mut handler = RecordingHandler::default();
    let token = session.cancel_token();

    let chunks = vec![
        Ok::<Vec<u8>, io::Error>(delta_frame("before").into_bytes()),
        Ok(delta_frame("after").into_bytes()),
    ];
    // Cancel while the second chunk is being delivered: its frames must
    // not be folded even though the chunk arrives.
    let stream = futures::stream::iter(chunks)
        .enumerate()
        .map(move |(index, item)| {
            if index == 1 {
                token.cancel();
            }
            item
        });

    let err = session
        .consume(Box::pin(stream), &mut handler)
        .await
        .unwrap_err();

    assert!(matches!(err, StreamError::Cancelled));
    assert_eq!(session.state(), SessionState::Cancelled);
    assert_eq!(handler.deltas, vec!["before"]);
    assert!(handler.completed.is_empty());
    assert_eq!(handler.errors.len(), 1);
}

#[tokio::test]
async fn cancelled_before_start_folds_nothing() {
    let mut session = StreamSession::default();
    let mut handler = RecordingHandler::default();
    session.cancel_token().cancel();

    let stream = ok_chunks(vec!["data: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\n"]);
    let err = session.consume(stream, &mut handler).await.unwrap_err();

    assert!(matches!(err, StreamError::Cancelled));
    assert!(handler.deltas.is_empty());
}

#[tokio::test]
async fn session_is_single_use() {
    let mut session = StreamSession::default();
    let mut handler = RecordingHandler::default();

    let stream = ok_chunks(vec!["data: [DONE]\n"]);
    session.consume(stream, &mut handler).await.unwrap();

    let again = ok_chunks(vec!["data: [DONE]\n"]);
    let err = session.consume(again, &mut handler).await.unwrap_err();
    assert!(matches!(err, StreamError::SessionBusy));
    // Rejection must not re-fire terminal callbacks.
    assert_eq!(handler.completed.len(), 1);
    assert!(handler.errors.is_empty());
}

#[tokio::test]
async fn begin_request_rejects_while_active() {
    let mut session = StreamSession::default();
    session.begin_request().unwrap();
    assert!(matches!(
        session.begin_request(),
        Err(StreamError::SessionBusy)
    ));
}
