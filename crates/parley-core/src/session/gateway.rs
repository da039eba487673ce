//! Remote chat gateway trait.
//!
//! Defines the REST contract the session controller consumes.

use super::model::{ChatReply, Session, SessionDetail};
use crate::error::Result;
use async_trait::async_trait;

/// The remote source of truth for sessions and their messages.
///
/// The client never implements persistence itself; every mutation goes
/// through this trait and the local stores are refreshed from it.
///
/// # Implementation Notes
///
/// Implementations should report:
/// - `ParleyError::NotFound` for an unknown session id
/// - `ParleyError::Unauthenticated` when the credential is rejected
/// - `Network` / `Server` / `Serialization` for every other failure
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Lists all sessions of the current user, in the gateway's order.
    async fn list_sessions(&self) -> Result<Vec<Session>>;

    /// Fetches a session with its message history.
    ///
    /// # Returns
    ///
    /// - `Ok(SessionDetail)`: Session found
    /// - `Err(NotFound)`: No session with that id
    async fn get_session(&self, session_id: &str) -> Result<SessionDetail>;

    /// Creates a session with the given title.
    async fn create_session(&self, title: &str) -> Result<Session>;

    /// Renames a session.
    async fn update_session_title(&self, session_id: &str, title: &str) -> Result<()>;

    /// Deletes a session and its messages.
    async fn delete_session(&self, session_id: &str) -> Result<()>;

    /// Sends a user message and waits for the assistant's reply.
    ///
    /// The gateway persists both the user message and the reply.
    async fn send_chat_message(&self, session_id: &str, text: &str) -> Result<ChatReply>;
}
