use tracing::warn;
use uuid::Uuid;

use super::event::DeltaEvent;

/// The growing assistant reply.
///
/// Append-only while streaming; the streaming flag flips to false exactly
/// once, on stream termination. The content at any point is the exact
/// concatenation of every text delta folded so far, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccumulatedMessage {
    content: String,
    streaming: bool,
}

impl AccumulatedMessage {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            content: String::new(),
            streaming: true,
        }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub const fn is_streaming(&self) -> bool {
        self.streaming
    }
}

/// Identity of the conversation a stream belongs to.
///
/// May start unset and be assigned exactly once mid-stream; immutable for
/// the rest of the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationRef {
    pub id: Uuid,
    pub title: Option<String>,
}

/// What a fold changed, so the session knows what to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Folded {
    /// Text was appended; carries the fragment that was added.
    Appended(String),
    /// The conversation ref was assigned for the first time.
    Assigned(ConversationRef),
    /// Nothing observable changed.
    Skipped,
}

/// Folds parsed delta events into the session's accumulated state.
#[derive(Debug)]
pub struct DeltaAccumulator {
    message: AccumulatedMessage,
    conversation: Option<ConversationRef>,
}

impl Default for DeltaAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl DeltaAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            message: AccumulatedMessage::new(),
            conversation: None,
        }
    }

    #[must_use]
    pub fn message(&self) -> &AccumulatedMessage {
        &self.message
    }

    #[must_use]
    pub fn conversation(&self) -> Option<&ConversationRef> {
        self.conversation.as_ref()
    }

    /// Folds one event into the accumulated state. Never fails; events
    /// that change nothing (including `Unparseable`) are skipped.
    pub fn fold(&mut self, event: DeltaEvent) -> Folded {
        match event {
            DeltaEvent::TextDelta(delta) => {
                self.message.content.push_str(&delta);
                Folded::Appended(delta)
            }
            DeltaEvent::ConversationAssigned { id, title } => match &self.conversation {
                None => {
                    let conversation = ConversationRef { id, title };
                    self.conversation = Some(conversation.clone());
                    Folded::Assigned(conversation)
                }
                Some(existing) => {
                    // First assignment wins; the stream's identity is fixed.
                    if existing.id != id {
                        warn!(
                            current = %existing.id,
                            incoming = %id,
                            "ignoring conversation reassignment mid-stream"
                        );
                    }
                    Folded::Skipped
                }
            },
            // Upstream errors terminate the session before folding; treat a
            // stray one like an unparseable frame.
            DeltaEvent::UpstreamError(_) | DeltaEvent::Unparseable(_) => Folded::Skipped,
        }
    }

    /// Marks the message finalized. Idempotent.
    pub(crate) fn finalize(&mut self) {
        self.message.streaming = false;
    }

    /// Drops any accumulated text, keeping the message state otherwise.
    pub(crate) fn discard_content(&mut self) {
        self.message.content.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_text_deltas_in_order() {
        let mut accumulator = DeltaAccumulator::new();
        accumulator.fold(DeltaEvent::TextDelta("Hel".into()));
        accumulator.fold(DeltaEvent::TextDelta("lo".into()));
        assert_eq!(accumulator.message().content(), "Hello");
        assert!(accumulator.message().is_streaming());
    }

    #[test]
    fn preserves_exact_whitespace() {
        let mut accumulator = DeltaAccumulator::new();
        accumulator.fold(DeltaEvent::TextDelta("a  ".into()));
        accumulator.fold(DeltaEvent::TextDelta("  b\n".into()));
        assert_eq!(accumulator.message().content(), "a    b\n");
    }

    #[test]
    fn first_conversation_assignment_wins() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let mut accumulator = DeltaAccumulator::new();

        let folded = accumulator.fold(DeltaEvent::ConversationAssigned {
            id: first,
            title: Some("First".into()),
        });
        assert!(matches!(folded, Folded::Assigned(_)));

        let folded = accumulator.fold(DeltaEvent::ConversationAssigned {
            id: second,
            title: Some("Second".into()),
        });
        assert_eq!(folded, Folded::Skipped);
        assert_eq!(accumulator.conversation().unwrap().id, first);
        assert_eq!(accumulator.conversation().unwrap().title.as_deref(), Some("First"));
    }

    #[test]
    fn unparseable_changes_nothing() {
        let mut accumulator = DeltaAccumulator::new();
        accumulator.fold(DeltaEvent::TextDelta("text".into()));
        let before = accumulator.message().clone();

        let folded = accumulator.fold(DeltaEvent::Unparseable("{not json".into()));
        assert_eq!(folded, Folded::Skipped);
        assert_eq!(accumulator.message(), &before);
    }

    #[test]
    fn finalize_flips_streaming_once() {
        let mut accumulator = DeltaAccumulator::new();
        accumulator.finalize();
        assert!(!accumulator.message().is_streaming());
        accumulator.finalize();
        assert!(!accumulator.message().is_streaming());
    }
}
