use driftchat_shared::models::{
    BalanceResponse, LoginRequest, LoginResponse, RegisterRequest, TopUpRequest, TopUpResponse,
    User,
};

use super::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Registers a new account. The server logs the account in and returns
    /// a token alongside the created user.
    pub async fn register(&self, request: &RegisterRequest) -> Result<LoginResponse, ApiError> {
        let url = self.endpoint("auth/register")?;
        let response = self.http().post(url).json(request).send().await?;
        Ok(Self::into_api_result(response).await?.json().await?)
    }

    /// Authenticates with email and password.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let url = self.endpoint("auth/login")?;
        let response = self.http().post(url).json(request).send().await?;
        Ok(Self::into_api_result(response).await?.json().await?)
    }

    /// Fetches the authenticated user's profile.
    pub async fn me(&self) -> Result<User, ApiError> {
        let url = self.endpoint("auth/me")?;
        let request = self.authorize(self.http().get(url))?;
        let response = request.send().await?;
        Ok(Self::into_api_result(response).await?.json().await?)
    }

    /// Fetches the current credit balance.
    pub async fn balance(&self) -> Result<BalanceResponse, ApiError> {
        let url = self.endpoint("auth/balance")?;
        let request = self.authorize(self.http().get(url))?;
        let response = request.send().await?;
        Ok(Self::into_api_result(response).await?.json().await?)
    }

    /// Adds credit to the account.
    pub async fn top_up(&self, request: &TopUpRequest) -> Result<TopUpResponse, ApiError> {
        let url = self.endpoint("auth/topup")?;
        let request = self.authorize(self.http().post(url))?.json(request);
        let response = request.send().await?;
        Ok(Self::into_api_result(response).await?.json().await?)
    }
}
