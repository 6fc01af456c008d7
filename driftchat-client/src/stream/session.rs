use futures_util::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::accumulator::{AccumulatedMessage, ConversationRef, DeltaAccumulator, Folded};
use super::decoder::{SseFrame, SseFrameDecoder};
use super::event::DeltaEvent;
use crate::error::StreamError;

/// Lifecycle of a stream session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No request outstanding.
    Idle,
    /// Request issued, response headers not yet confirmed.
    Requesting,
    /// Frames arriving.
    Streaming,
    /// Terminal sentinel or transport end-of-stream reached.
    Completed,
    /// Caller-initiated abort.
    Cancelled,
    /// Transport error, non-success status, or upstream error payload.
    Failed,
}

/// What happens to partial assistant text when a stream ends abnormally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartialMessagePolicy {
    /// Keep the partial text visible; the message is marked errored, not lost.
    #[default]
    Keep,
    /// Drop the partial text.
    Discard,
}

/// Observer interface the session publishes to.
///
/// Each non-empty text delta triggers exactly one `on_delta`, in arrival
/// order. Exactly one of `on_complete` / `on_error` fires per stream.
pub trait StreamHandler {
    fn on_delta(&mut self, text: &str);
    fn on_conversation_assigned(&mut self, conversation: &ConversationRef);
    fn on_complete(&mut self, final_text: &str);
    fn on_error(&mut self, error: &StreamError);
}

/// How a stream read loop ended.
enum Outcome {
    Completed,
    Cancelled,
    Failed(StreamError),
}

/// What processing one frame decided.
enum FrameOutcome {
    Continue,
    Done,
    Failed(StreamError),
}

/// Owns one logical chat stream: the accumulated reply, the conversation
/// ref, and the state machine `Idle -> Requesting -> Streaming ->
/// {Completed, Cancelled, Failed}`.
///
/// A session drives a single stream and is not reused; create a fresh one
/// per message. The transport stream passed to [`StreamSession::consume`]
/// is dropped on every exit path, which releases the connection.
#[derive(Debug)]
pub struct StreamSession {
    state: SessionState,
    accumulator: DeltaAccumulator,
    policy: PartialMessagePolicy,
    cancel: CancellationToken,
}

impl Default for StreamSession {
    fn default() -> Self {
        Self::new(PartialMessagePolicy::default())
    }
}

impl StreamSession {
    #[must_use]
    pub fn new(policy: PartialMessagePolicy) -> Self {
        Self {
            state: SessionState::Idle,
            accumulator: DeltaAccumulator::new(),
            policy,
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn message(&self) -> &AccumulatedMessage {
        self.accumulator.message()
    }

    #[must_use]
    pub fn conversation(&self) -> Option<&ConversationRef> {
        self.accumulator.conversation()
    }

    /// Hands out a cancellation handle for this stream. Cancelling stops
    /// the read loop within one pending read; frames already buffered are
    /// not folded after cancellation is observed.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Marks the network request as issued. Rejects when a stream is
    /// already active or the session has already run.
    pub fn begin_request(&mut self) -> Result<(), StreamError> {
        match self.state {
            SessionState::Idle => {
                self.state = SessionState::Requesting;
                Ok(())
            }
            _ => Err(StreamError::SessionBusy),
        }
    }

    /// Consumes a transport byte stream to completion, publishing state to
    /// the handler after each delta.
    ///
    /// Accepts any chunked byte stream, so both `reqwest`'s
    /// `bytes_stream()` and scripted in-memory streams work. Returns the
    /// final text on completion; a busy-session rejection returns
    /// [`StreamError::SessionBusy`] without touching the handler.
    pub async fn consume<S, B, E, H>(
        &mut self,
        stream: S,
        handler: &mut H,
    ) -> Result<String, StreamError>
    where
        S: Stream<Item = Result<B, E>> + Unpin,
        B: AsRef<[u8]>,
        E: std::error::Error + Send + Sync + 'static,
        H: StreamHandler,
    {
        match self.state {
            SessionState::Idle | SessionState::Requesting => {}
            _ => return Err(StreamError::SessionBusy),
        }
        self.state = SessionState::Streaming;
        debug!("stream session entered streaming state");

        let mut decoder = SseFrameDecoder::new();
        let mut stream = stream;
        let cancel = self.cancel.clone();

        let outcome = 'read: loop {
            let item = tokio::select! {
                biased;
                () = cancel.cancelled() => break 'read Outcome::Cancelled,
                item = stream.next() => item,
            };

            match item {
                Some(Ok(chunk)) => {
                    for frame in decoder.feed(chunk.as_ref()) {
                        if cancel.is_cancelled() {
                            break 'read Outcome::Cancelled;
                        }
                        match self.apply_frame(frame, handler) {
                            FrameOutcome::Continue => {}
                            FrameOutcome::Done => break 'read Outcome::Completed,
                            FrameOutcome::Failed(err) => break 'read Outcome::Failed(err),
                        }
                    }
                }
                Some(Err(err)) => break 'read Outcome::Failed(StreamError::transport(err)),
                None => {
                    // Transport end-of-stream: flush whatever is buffered.
                    for frame in decoder.finish() {
                        match self.apply_frame(frame, handler) {
                            FrameOutcome::Continue | FrameOutcome::Done => {}
                            FrameOutcome::Failed(err) => break 'read Outcome::Failed(err),
                        }
                    }
                    break 'read Outcome::Completed;
                }
            }
        };

        drop(stream);

        match outcome {
            Outcome::Completed => {
                self.accumulator.finalize();
                self.state = SessionState::Completed;
                let final_text = self.accumulator.message().content().to_string();
                info!(chars = final_text.len(), "stream completed");
                handler.on_complete(&final_text);
                Ok(final_text)
            }
            Outcome::Cancelled => {
                self.settle_partial();
                self.state = SessionState::Cancelled;
                info!("stream cancelled");
                let err = StreamError::Cancelled;
                handler.on_error(&err);
                Err(err)
            }
            Outcome::Failed(err) => Err(self.fail(err, handler)),
        }
    }

    /// Transitions to `Failed`, applying the partial-text policy and
    /// reporting the error exactly once. Also used for request-phase
    /// failures, before any stream exists.
    pub(crate) fn fail<H: StreamHandler>(
        &mut self,
        err: StreamError,
        handler: &mut H,
    ) -> StreamError {
        self.settle_partial();
        self.state = SessionState::Failed;
        info!(error = %err, "stream failed");
        handler.on_error(&err);
        err
    }

    fn settle_partial(&mut self) {
        if self.policy == PartialMessagePolicy::Discard {
            self.accumulator.discard_content();
        }
        self.accumulator.finalize();
    }

    fn apply_frame<H: StreamHandler>(
        &mut self,
        frame: SseFrame,
        handler: &mut H,
    ) -> FrameOutcome {
        let payload = match frame {
            SseFrame::Done => return FrameOutcome::Done,
            SseFrame::Payload(payload) => payload,
        };

        match DeltaEvent::parse(&payload) {
            DeltaEvent::UpstreamError(response) => {
                FrameOutcome::Failed(StreamError::Upstream(response))
            }
            event => {
                match self.accumulator.fold(event) {
                    Folded::Appended(delta) => {
                        if !delta.is_empty() {
                            handler.on_delta(&delta);
                        }
                    }
                    Folded::Assigned(conversation) => {
                        handler.on_conversation_assigned(&conversation);
                    }
                    Folded::Skipped => {}
                }
                FrameOutcome::Continue
            }
        }
    }
}
