//! REST implementation of [`AuthGateway`].

use crate::dto::{CredentialsRequest, TokenResponse};
use crate::http_client::{ApiClient, server_error, transport_error};
use async_trait::async_trait;
use parley_core::auth::AuthGateway;
use parley_core::error::Result;
use reqwest::Method;

/// Talks to `/api/users/login` and `/api/users/register`.
///
/// Unlike the chat endpoints, a 401 here is a rejected password, so every
/// error status is reported as `ParleyError::Server` with the backend's
/// message.
pub struct HttpAuthGateway {
    api: ApiClient,
}

impl HttpAuthGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn login(&self, user_id: &str, password: &str) -> Result<String> {
        let response = self
            .api
            .request(Method::POST, "/api/users/login")
            .json(&CredentialsRequest { user_id, password })
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(server_error(response).await);
        }

        let body: TokenResponse = response.json().await.map_err(transport_error)?;
        Ok(body.token)
    }

    async fn register(&self, user_id: &str, password: &str) -> Result<()> {
        let response = self
            .api
            .request(Method::POST, "/api/users/register")
            .json(&CredentialsRequest { user_id, password })
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(server_error(response).await);
        }
        Ok(())
    }
}
