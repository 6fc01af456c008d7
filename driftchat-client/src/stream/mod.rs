//! Incremental chat-stream consumption and assembly.
//!
//! [`SseFrameDecoder`] turns raw transport chunks into discrete frame
//! payloads, [`DeltaAccumulator`] folds parsed [`DeltaEvent`]s into the
//! growing reply, and [`StreamSession`] orchestrates the whole stream
//! lifecycle against a [`StreamHandler`].

pub mod accumulator;
pub mod decoder;
pub mod event;
pub mod session;

pub use accumulator::{AccumulatedMessage, ConversationRef, DeltaAccumulator, Folded};
pub use decoder::{SseFrame, SseFrameDecoder};
pub use event::DeltaEvent;
pub use session::{PartialMessagePolicy, SessionState, StreamHandler, StreamSession};
