//! Typed bindings for the chat API's REST and streaming endpoints.

pub mod auth;
pub mod chat;
pub mod conversations;
pub mod models;

use driftchat_shared::models::ErrorResponse;
use reqwest::{Client, RequestBuilder, Response};
use url::Url;

use crate::error::ApiError;

/// HTTP client for the chat API.
///
/// Carries the base URL and the caller's bearer token explicitly; there is
/// no ambient session state. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Builds a client for the given API base URL (for example
    /// `http://localhost:3000/api/`).
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(concat!("driftchat-client/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    /// Builds an authenticated client.
    pub fn with_token(base_url: Url, token: impl Into<String>) -> Result<Self, ApiError> {
        let mut client = Self::new(base_url)?;
        client.token = Some(token.into());
        Ok(client)
    }

    /// Installs or replaces the bearer token after login.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Attaches the bearer token, rejecting when none is set.
    pub(crate) fn authorize(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        match &self.token {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => Err(ApiError::Unauthenticated),
        }
    }

    /// Maps non-success statuses to [`ApiError::Status`], surfacing the
    /// server's error body when it parses.
    pub(crate) async fn into_api_result(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<ErrorResponse>(&text).unwrap_or_else(|_| {
            if text.is_empty() {
                ErrorResponse::new(status.to_string())
            } else {
                ErrorResponse::new(text)
            }
        });
        Err(ApiError::Status { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_relative_paths() {
        let client = ApiClient::new(Url::parse("http://localhost:3000/api/").unwrap()).unwrap();
        let url = client.endpoint("llm/models").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/llm/models");
    }

    #[test]
    fn authorize_requires_a_token() {
        let client = ApiClient::new(Url::parse("http://localhost:3000/api/").unwrap()).unwrap();
        let builder = client.http().get("http://localhost:3000/api/auth/me");
        assert!(matches!(
            client.authorize(builder),
            Err(ApiError::Unauthenticated)
        ));
    }
}
