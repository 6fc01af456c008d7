use driftchat_shared::models::ModelsResponse;

use super::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Lists the models available for chat completions.
    pub async fn list_models(&self) -> Result<ModelsResponse, ApiError> {
        let url = self.endpoint("llm/models")?;
        let request = self.authorize(self.http().get(url))?;
        let response = request.send().await?;
        Ok(Self::into_api_result(response).await?.json().await?)
    }
}
