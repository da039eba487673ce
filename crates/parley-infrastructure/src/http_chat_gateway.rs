//! REST implementation of [`ChatGateway`].

use crate::dto::{ChatDetailDto, ChatDto, ChatListDto, ChatReplyDto, ChatRequest, TitleRequest};
use crate::http_client::{ApiClient, server_error, transport_error};
use async_trait::async_trait;
use parley_core::auth::CredentialProvider;
use parley_core::error::{ParleyError, Result};
use parley_core::session::{ChatGateway, ChatReply, Session, SessionDetail};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use std::sync::Arc;

/// Talks to the `/api/chats` and `/api/chat` endpoints.
///
/// Every request carries the bearer token from the credential provider; a
/// missing token fails with `Unauthenticated` before anything is sent.
pub struct HttpChatGateway {
    api: ApiClient,
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpChatGateway {
    pub fn new(api: ApiClient, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self { api, credentials }
    }

    async fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self
            .credentials
            .credential()
            .await
            .ok_or(ParleyError::Unauthenticated)?;
        Ok(self.api.request(method, path).bearer_auth(token))
    }

    /// Sends a request and maps error statuses.
    ///
    /// `session_id` is used to build a `NotFound` error on 404.
    async fn execute(&self, request: RequestBuilder, session_id: Option<&str>) -> Result<Response> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ParleyError::Unauthenticated);
        }
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = session_id {
                return Err(ParleyError::not_found("session", id));
            }
        }
        Err(server_error(response).await)
    }

    fn chat_path(session_id: &str) -> String {
        format!("/api/chats/{}", session_id)
    }
}

#[async_trait]
impl ChatGateway for HttpChatGateway {
    async fn list_sessions(&self) -> Result<Vec<Session>> {
        let request = self.authorized(Method::GET, "/api/chats").await?;
        let response = self.execute(request, None).await?;
        let listing: ChatListDto = response.json().await.map_err(transport_error)?;
        Ok(listing.into_sessions())
    }

    async fn get_session(&self, session_id: &str) -> Result<SessionDetail> {
        let request = self
            .authorized(Method::GET, &Self::chat_path(session_id))
            .await?;
        let response = self.execute(request, Some(session_id)).await?;
        let detail: ChatDetailDto = response.json().await.map_err(transport_error)?;
        Ok(detail.into())
    }

    async fn create_session(&self, title: &str) -> Result<Session> {
        let request = self
            .authorized(Method::POST, "/api/chats")
            .await?
            .json(&TitleRequest { title });
        let response = self.execute(request, None).await?;
        let chat: ChatDto = response.json().await.map_err(transport_error)?;
        tracing::debug!("Gateway created chat {}", chat.id);
        Ok(chat.into())
    }

    async fn update_session_title(&self, session_id: &str, title: &str) -> Result<()> {
        let request = self
            .authorized(Method::PUT, &Self::chat_path(session_id))
            .await?
            .json(&TitleRequest { title });
        self.execute(request, Some(session_id)).await?;
        Ok(())
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let request = self
            .authorized(Method::DELETE, &Self::chat_path(session_id))
            .await?;
        self.execute(request, Some(session_id)).await?;
        Ok(())
    }

    async fn send_chat_message(&self, session_id: &str, text: &str) -> Result<ChatReply> {
        let request = self
            .authorized(Method::POST, "/api/chat")
            .await?
            .json(&ChatRequest {
                message: text,
                chat_id: session_id,
            });
        let response = self.execute(request, Some(session_id)).await?;
        let reply: ChatReplyDto = response.json().await.map_err(transport_error)?;
        Ok(ChatReply {
            reply: reply.reply.unwrap_or_default(),
        })
    }
}
