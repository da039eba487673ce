//! Authentication collaborators.
//!
//! Token issuance is the backend's concern; the client only stores the
//! bearer token it is given and forgets it on logout.

use async_trait::async_trait;

use crate::error::Result;

/// Holder of the bearer credential used for every chat request.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn has_credential(&self) -> bool {
        self.credential().await.is_some()
    }

    /// Returns the current bearer token, if logged in.
    async fn credential(&self) -> Option<String>;

    async fn save_credential(&self, token: String) -> Result<()>;

    async fn clear_credential(&self) -> Result<()>;
}

/// Account endpoints of the remote backend.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchanges a user id and password for a bearer token.
    async fn login(&self, user_id: &str, password: &str) -> Result<String>;

    /// Creates an account. Does not log in.
    async fn register(&self, user_id: &str, password: &str) -> Result<()>;
}
