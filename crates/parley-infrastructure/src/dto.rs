//! Wire types of the chat backend.
//!
//! The backend speaks MongoDB-flavoured JSON: identifiers come as `_id`,
//! assistant turns are tagged `"bot"`, and the chat listing may or may not be
//! wrapped in a `chats` object. These DTOs absorb those quirks and convert to
//! the domain types.

use parley_core::session::{Message, MessageRole, Session, SessionDetail};
use serde::{Deserialize, Serialize};

/// A chat as listed or created by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
}

impl From<ChatDto> for Session {
    fn from(dto: ChatDto) -> Self {
        Session::new(dto.id, dto.title)
    }
}

/// `GET /api/chats` answers either `[...]` or `{ "chats": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ChatListDto {
    Bare(Vec<ChatDto>),
    Wrapped {
        #[serde(default)]
        chats: Vec<ChatDto>,
    },
}

impl ChatListDto {
    pub fn into_sessions(self) -> Vec<Session> {
        let chats = match self {
            Self::Bare(chats) => chats,
            Self::Wrapped { chats } => chats,
        };
        chats.into_iter().map(Session::from).collect()
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub enum RoleDto {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "bot", alias = "assistant")]
    Bot,
    /// Anything else the backend may store is shown as an assistant turn.
    #[serde(other)]
    Other,
}

impl From<RoleDto> for MessageRole {
    fn from(role: RoleDto) -> Self {
        match role {
            RoleDto::User => MessageRole::User,
            RoleDto::Bot | RoleDto::Other => MessageRole::Assistant,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageDto {
    pub role: RoleDto,
    #[serde(default)]
    pub text: String,
}

impl From<MessageDto> for Message {
    fn from(dto: MessageDto) -> Self {
        Message {
            role: dto.role.into(),
            text: dto.text,
        }
    }
}

/// `GET /api/chats/{id}`
#[derive(Debug, Deserialize)]
pub struct ChatDetailDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub messages: Vec<MessageDto>,
}

impl From<ChatDetailDto> for SessionDetail {
    fn from(dto: ChatDetailDto) -> Self {
        SessionDetail {
            id: dto.id,
            messages: dto.messages.into_iter().map(Message::from).collect(),
        }
    }
}

/// Body of `POST /api/chats` and `PUT /api/chats/{id}`.
#[derive(Debug, Serialize)]
pub struct TitleRequest<'a> {
    pub title: &'a str,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    #[serde(rename = "chatId")]
    pub chat_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatReplyDto {
    #[serde(default)]
    pub reply: Option<String>,
}

/// Body of the login and register endpoints.
#[derive(Debug, Serialize)]
pub struct CredentialsRequest<'a> {
    #[serde(rename = "userId")]
    pub user_id: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Error payload: `{ "message": "..." }`.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_accepts_bare_array() {
        let json = r#"[{"_id":"a1","title":"First"},{"_id":"b2","title":"Second"}]"#;
        let sessions = serde_json::from_str::<ChatListDto>(json)
            .unwrap()
            .into_sessions();

        assert_eq!(sessions, vec![Session::new("a1", "First"), Session::new("b2", "Second")]);
    }

    #[test]
    fn test_listing_accepts_wrapped_object() {
        let json = r#"{"chats":[{"_id":"a1","title":"First","createdAt":"2024-01-01"}]}"#;
        let sessions = serde_json::from_str::<ChatListDto>(json)
            .unwrap()
            .into_sessions();

        assert_eq!(sessions, vec![Session::new("a1", "First")]);
    }

    #[test]
    fn test_listing_object_without_chats_is_empty() {
        let sessions = serde_json::from_str::<ChatListDto>("{}")
            .unwrap()
            .into_sessions();

        assert!(sessions.is_empty());
    }

    #[test]
    fn test_detail_maps_bot_role_to_assistant() {
        let json = r#"{
            "_id": "a1",
            "messages": [
                {"role": "user", "text": "hi"},
                {"role": "bot", "text": "hello"},
                {"role": "assistant", "text": "again"}
            ]
        }"#;
        let detail: SessionDetail = serde_json::from_str::<ChatDetailDto>(json).unwrap().into();

        assert_eq!(
            detail.messages,
            vec![
                Message::user("hi"),
                Message::assistant("hello"),
                Message::assistant("again"),
            ]
        );
    }

    #[test]
    fn test_detail_without_messages_is_empty() {
        let detail: SessionDetail = serde_json::from_str::<ChatDetailDto>(r#"{"_id":"a1"}"#)
            .unwrap()
            .into();

        assert!(detail.messages.is_empty());
    }

    #[test]
    fn test_chat_request_uses_backend_field_names() {
        let body = serde_json::to_value(ChatRequest {
            message: "hi",
            chat_id: "a1",
        })
        .unwrap();

        assert_eq!(body, serde_json::json!({"message": "hi", "chatId": "a1"}));
    }
}
