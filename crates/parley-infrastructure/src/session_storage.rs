//! Volatile key-value storage scoped to one login.
//!
//! Holds the bearer token and the active session id in memory. Nothing is
//! written to disk, so state lives exactly as long as the process.

use async_trait::async_trait;
use parley_core::auth::CredentialProvider;
use parley_core::error::Result;
use parley_core::state::StateRepository;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const TOKEN_KEY: &str = "token";
pub const CURRENT_CHAT_KEY: &str = "currentChatId";

/// In-memory string store implementing both [`CredentialProvider`] and
/// [`StateRepository`].
///
/// Clones share the same entries, so a controller rebuilt from the same
/// storage resumes where the previous one left off.
///
/// # Example
///
/// ```ignore
/// let storage = SessionStorage::new();
/// storage.save_credential("token".to_string()).await?;
/// storage.set_active_session("chat-1".to_string()).await?;
/// ```
#[derive(Clone, Default)]
pub struct SessionStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl SessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_item(&self, key: &str) -> Option<String> {
        self.entries.lock().await.get(key).cloned()
    }

    pub async fn set_item(&self, key: &str, value: String) {
        self.entries.lock().await.insert(key.to_string(), value);
    }

    pub async fn remove_item(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }
}

#[async_trait]
impl CredentialProvider for SessionStorage {
    async fn credential(&self) -> Option<String> {
        self.get_item(TOKEN_KEY).await.filter(|t| !t.is_empty())
    }

    async fn save_credential(&self, token: String) -> Result<()> {
        self.set_item(TOKEN_KEY, token).await;
        Ok(())
    }

    async fn clear_credential(&self) -> Result<()> {
        self.remove_item(TOKEN_KEY).await;
        Ok(())
    }
}

#[async_trait]
impl StateRepository for SessionStorage {
    async fn get_active_session(&self) -> Option<String> {
        self.get_item(CURRENT_CHAT_KEY).await
    }

    async fn set_active_session(&self, session_id: String) -> Result<()> {
        self.set_item(CURRENT_CHAT_KEY, session_id).await;
        Ok(())
    }

    async fn clear_active_session(&self) -> Result<()> {
        self.remove_item(CURRENT_CHAT_KEY).await;
        Ok(())
    }
}
