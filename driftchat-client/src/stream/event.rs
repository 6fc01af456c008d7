use driftchat_shared::models::{
    ChatStreamChunk, ConversationAssignedPayload, ErrorResponse, UpstreamErrorPayload,
};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

/// The parsed, structured form of one frame payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeltaEvent {
    /// An incremental text fragment to append to the reply.
    TextDelta(String),
    /// The server assigned the stream to a conversation.
    ConversationAssigned { id: Uuid, title: Option<String> },
    /// The server reported a structured failure mid-stream.
    UpstreamError(ErrorResponse),
    /// The payload did not decode as any recognized shape.
    Unparseable(String),
}

/// The recognized wire shapes, tried in order.
#[derive(Deserialize)]
#[serde(untagged)]
enum WirePayload {
    Chunk(ChatStreamChunk),
    Conversation(ConversationAssignedPayload),
    Error(UpstreamErrorPayload),
}

impl DeltaEvent {
    /// Parses a frame payload. Total: decode failure yields
    /// [`DeltaEvent::Unparseable`], never an error.
    #[must_use]
    pub fn parse(payload: &str) -> Self {
        match serde_json::from_str::<WirePayload>(payload) {
            Ok(WirePayload::Chunk(chunk)) => {
                let mut text = String::new();
                for choice in chunk.choices {
                    if let Some(content) = choice.delta.content {
                        text.push_str(&content);
                    }
                }
                Self::TextDelta(text)
            }
            Ok(WirePayload::Conversation(assigned)) => Self::ConversationAssigned {
                id: assigned.conversation_id,
                title: assigned.title,
            },
            Ok(WirePayload::Error(failure)) => {
                let body = failure.error;
                Self::UpstreamError(match body.code {
                    Some(code) => ErrorResponse::with_details(body.message, code),
                    None => ErrorResponse::new(body.message),
                })
            }
            Err(err) => {
                debug!(%err, payload, "skipping unparseable stream frame");
                Self::Unparseable(payload.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_text_delta() {
        let event = DeltaEvent::parse(r#"{"choices":[{"delta":{"content":"Hel"}}]}"#);
        assert_eq!(event, DeltaEvent::TextDelta("Hel".to_string()));
    }

    #[test]
    fn concatenates_multiple_choices_in_order() {
        let event = DeltaEvent::parse(
            r#"{"choices":[{"index":0,"delta":{"content":"a"}},{"index":1,"delta":{"content":"b"}}]}"#,
        );
        assert_eq!(event, DeltaEvent::TextDelta("ab".to_string()));
    }

    #[test]
    fn role_only_chunk_is_an_empty_delta() {
        let event = DeltaEvent::parse(r#"{"choices":[{"delta":{"role":"assistant"}}]}"#);
        assert_eq!(event, DeltaEvent::TextDelta(String::new()));
    }

    #[test]
    fn parses_conversation_assignment() {
        let id = Uuid::new_v4();
        let payload = format!(r#"{{"conversation_id":"{id}","title":"Trip planning"}}"#);
        assert_eq!(
            DeltaEvent::parse(&payload),
            DeltaEvent::ConversationAssigned {
                id,
                title: Some("Trip planning".to_string()),
            }
        );
    }

    #[test]
    fn parses_upstream_error() {
        let event =
            DeltaEvent::parse(r#"{"error":{"message":"Insufficient balance","code":"balance_low"}}"#);
        match event {
            DeltaEvent::UpstreamError(response) => {
                assert_eq!(response.message, "Insufficient balance");
                assert_eq!(response.details.as_deref(), Some("balance_low"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_unparseable() {
        let event = DeltaEvent::parse("{not json");
        assert_eq!(event, DeltaEvent::Unparseable("{not json".to_string()));
    }

    #[test]
    fn unrecognized_shape_is_unparseable() {
        let event = DeltaEvent::parse(r#"{"ping":true}"#);
        assert_eq!(event, DeltaEvent::Unparseable(r#"{"ping":true}"#.to_string()));
    }
}
