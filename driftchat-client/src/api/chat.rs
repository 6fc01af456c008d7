use driftchat_shared::models::ChatStreamRequest;
use reqwest::Response;

use super::ApiClient;
use crate::error::{ApiError, StreamError};
use crate::stream::{StreamHandler, StreamSession};

impl From<ApiError> for StreamError {
    fn from(err: ApiError) -> Self {
        match err {
            // A rejected request carries the server's structured failure,
            // e.g. insufficient balance; surface it verbatim.
            ApiError::Status { body, .. } => Self::Upstream(body),
            other => Self::Transport {
                source: Box::new(other),
            },
        }
    }
}

impl ApiClient {
    /// Sends a chat message and drives the session over the streaming
    /// response until it completes, is cancelled, or fails.
    ///
    /// The session must be fresh; a session that is already running (or
    /// has already run) is rejected with [`StreamError::SessionBusy`]
    /// before any request is issued. All other failures transition the
    /// session to `Failed` and reach the handler exactly once.
    pub async fn stream_chat<H: StreamHandler>(
        &self,
        request: &ChatStreamRequest,
        session: &mut StreamSession,
        handler: &mut H,
    ) -> Result<String, StreamError> {
        session.begin_request()?;

        match self.open_chat_stream(request).await {
            Ok(response) => {
                session
                    .consume(Box::pin(response.bytes_stream()), handler)
                    .await
            }
            Err(err) => Err(session.fail(err, handler)),
        }
    }

    async fn open_chat_stream(
        &self,
        request: &ChatStreamRequest,
    ) -> Result<Response, StreamError> {
        let url = self.endpoint("llm/chat/stream").map_err(StreamError::from)?;
        let builder = self
            .authorize(self.http().post(url))
            .map_err(StreamError::from)?;
        let response = builder
            .json(request)
            .send()
            .await
            .map_err(StreamError::transport)?;
        Self::into_api_result(response)
            .await
            .map_err(StreamError::from)
    }
}
