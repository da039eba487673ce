//! State repository trait.

use async_trait::async_trait;

use crate::error::Result;

/// Volatile per-login storage for the active session id.
///
/// Lets a freshly built controller resume the session the user was on,
/// for as long as the login lasts. Cleared on logout.
#[async_trait]
pub trait StateRepository: Send + Sync {
    async fn get_active_session(&self) -> Option<String>;

    async fn set_active_session(&self, session_id: String) -> Result<()>;

    async fn clear_active_session(&self) -> Result<()>;
}
