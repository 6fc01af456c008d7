use driftchat_shared::models::{
    Conversation, ConversationListResponse, CreateConversationRequest,
};
use uuid::Uuid;

use super::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Lists the caller's conversations, most recent first.
    pub async fn list_conversations(&self) -> Result<ConversationListResponse, ApiError> {
        let url = self.endpoint("conversations")?;
        let request = self.authorize(self.http().get(url))?;
        let response = request.send().await?;
        Ok(Self::into_api_result(response).await?.json().await?)
    }

    /// Fetches one conversation with its full message history.
    pub async fn get_conversation(&self, id: Uuid) -> Result<Conversation, ApiError> {
        let url = self.endpoint(&format!("conversations/{id}"))?;
        let request = self.authorize(self.http().get(url))?;
        let response = request.send().await?;
        Ok(Self::into_api_result(response).await?.json().await?)
    }

    /// Creates an empty conversation pinned to a model.
    pub async fn create_conversation(
        &self,
        request: &CreateConversationRequest,
    ) -> Result<Conversation, ApiError> {
        let url = self.endpoint("conversations")?;
        let request = self.authorize(self.http().post(url))?.json(request);
        let response = request.send().await?;
        Ok(Self::into_api_result(response).await?.json().await?)
    }

    /// Deletes a conversation.
    pub async fn delete_conversation(&self, id: Uuid) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("conversations/{id}"))?;
        let request = self.authorize(self.http().delete(url))?;
        let response = request.send().await?;
        Self::into_api_result(response).await?;
        Ok(())
    }
}
