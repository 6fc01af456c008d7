//! DriftChat core client library.
//!
//! The centerpiece is the [`stream`] module: an incremental SSE frame
//! decoder, a delta accumulator, and the [`stream::StreamSession`] state
//! machine that turns an arbitrarily chunked byte stream into a growing
//! assistant reply. The [`api`] module wraps the REST endpoints the chat
//! client consumes (auth, models, conversations, streaming chat).

pub mod api;
pub mod error;
pub mod stream;

pub use api::ApiClient;
pub use error::{ApiError, StreamError};
pub use stream::{
    AccumulatedMessage, ConversationRef, DeltaAccumulator, DeltaEvent, PartialMessagePolicy,
    SessionState, SseFrame, SseFrameDecoder, StreamHandler, StreamSession,
};
