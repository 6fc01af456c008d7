use driftchat_shared::models::ErrorResponse;
use thiserror::Error;

/// Fatal outcomes of a chat stream.
///
/// Malformed frames are not represented here: they are logged and skipped
/// inside the pipeline and never surface to the caller.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The connection dropped or a chunk read failed mid-stream.
    #[error("transport error: {source}")]
    Transport {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The server reported a structured failure, surfaced verbatim.
    #[error("upstream error: {0}")]
    Upstream(ErrorResponse),

    /// The caller cancelled the stream. Not a true failure.
    #[error("stream cancelled")]
    Cancelled,

    /// A stream is already active on this session.
    #[error("a stream is already active on this session")]
    SessionBusy,
}

impl StreamError {
    pub(crate) fn transport(
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            source: Box::new(source),
        }
    }
}

/// Errors from the plain request/response API surface.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),

    #[error("server rejected the request ({status}): {body}")]
    Status {
        status: reqwest::StatusCode,
        body: ErrorResponse,
    },

    #[error("not authenticated; log in first")]
    Unauthenticated,
}
