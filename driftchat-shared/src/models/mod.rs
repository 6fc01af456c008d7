pub mod conversation;
pub mod errors;
pub mod message;
pub mod model;
pub mod streaming;
pub mod user;

pub use conversation::{
    Conversation, ConversationListResponse, ConversationSummary, CreateConversationRequest,
};
pub use errors::ErrorResponse;
pub use message::{ChatMessage, MessageRole, MessageStatus, StoredMessage};
pub use model::{ModelInfo, ModelsResponse};
pub use streaming::{
    ChatStreamChunk, ChatStreamRequest, ConversationAssignedPayload, StreamChoice, StreamDelta,
    UpstreamErrorBody, UpstreamErrorPayload,
};
pub use user::{
    BalanceResponse, LoginRequest, LoginResponse, RegisterRequest, TopUpRequest, TopUpResponse,
    User,
};
