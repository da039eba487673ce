//! Account use cases: login and registration.

use parley_core::auth::{AuthGateway, CredentialProvider};
use parley_core::error::{ParleyError, Result};
use std::sync::Arc;

/// Coordinates the account endpoints with local credential storage.
///
/// Logout lives on the session controller because it also has to wipe the
/// session stores.
pub struct AuthUseCase {
    gateway: Arc<dyn AuthGateway>,
    credentials: Arc<dyn CredentialProvider>,
}

impl AuthUseCase {
    pub fn new(gateway: Arc<dyn AuthGateway>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            gateway,
            credentials,
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.credentials.has_credential().await
    }

    /// Logs in and stores the returned token.
    ///
    /// # Errors
    ///
    /// Returns the gateway error unchanged; `ParleyError::Server` carries the
    /// backend's message (e.g. "Invalid credentials").
    pub async fn login(&self, user_id: &str, password: &str) -> Result<()> {
        let token = self.gateway.login(user_id.trim(), password).await?;
        self.credentials.save_credential(token).await?;
        tracing::info!("[Auth] Logged in as {}", user_id.trim());
        Ok(())
    }

    /// Registers a new account. The user still has to log in afterwards.
    ///
    /// All inputs are trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Validation` without calling the gateway when a
    /// field is empty or the passwords differ.
    pub async fn register(&self, user_id: &str, password: &str, confirmation: &str) -> Result<()> {
        let user_id = user_id.trim();
        let password = password.trim();
        let confirmation = confirmation.trim();

        if user_id.is_empty() || password.is_empty() || confirmation.is_empty() {
            return Err(ParleyError::validation("All fields are required"));
        }
        if password != confirmation {
            return Err(ParleyError::validation("Passwords do not match"));
        }

        self.gateway.register(user_id, password).await?;
        tracing::info!("[Auth] Registered {}", user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockAuthGateway {
        calls: Mutex<Vec<String>>,
        reject_login: bool,
    }

    #[async_trait]
    impl AuthGateway for MockAuthGateway {
        async fn login(&self, user_id: &str, _password: &str) -> Result<String> {
            self.calls.lock().unwrap().push(format!("login:{}", user_id));
            if self.reject_login {
                return Err(ParleyError::server(401, "Invalid credentials"));
            }
            Ok(format!("token-{}", user_id))
        }

        async fn register(&self, user_id: &str, password: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("register:{}:{}", user_id, password));
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockCredentials {
        token: Mutex<Option<String>>,
    }

    #[async_trait]
    impl CredentialProvider for MockCredentials {
        async fn credential(&self) -> Option<String> {
            self.token.lock().unwrap().clone()
        }

        async fn save_credential(&self, token: String) -> Result<()> {
            *self.token.lock().unwrap() = Some(token);
            Ok(())
        }

        async fn clear_credential(&self) -> Result<()> {
            *self.token.lock().unwrap() = None;
            Ok(())
        }
    }

    fn usecase(gateway: Arc<MockAuthGateway>) -> (AuthUseCase, Arc<MockCredentials>) {
        let credentials = Arc::new(MockCredentials::default());
        (AuthUseCase::new(gateway, credentials.clone()), credentials)
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let gateway = Arc::new(MockAuthGateway::default());
        let (auth, credentials) = usecase(gateway);

        assert!(!auth.is_authenticated().await);
        auth.login(" alice ", "secret").await.unwrap();

        assert!(auth.is_authenticated().await);
        assert_eq!(credentials.credential().await, Some("token-alice".to_string()));
    }

    #[tokio::test]
    async fn test_rejected_login_keeps_user_logged_out() {
        let gateway = Arc::new(MockAuthGateway {
            reject_login: true,
            ..Default::default()
        });
        let (auth, _) = usecase(gateway);

        let err = auth.login("alice", "wrong").await.unwrap_err();

        assert_eq!(err.user_message(), "Invalid credentials");
        assert!(!auth.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_register_rejects_mismatched_passwords_without_network_call() {
        let gateway = Arc::new(MockAuthGateway::default());
        let (auth, _) = usecase(gateway.clone());

        let err = auth.register("bob", "one", "two").await.unwrap_err();

        assert_eq!(err, ParleyError::validation("Passwords do not match"));
        assert!(gateway.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_rejects_blank_fields() {
        let gateway = Arc::new(MockAuthGateway::default());
        let (auth, _) = usecase(gateway.clone());

        let err = auth.register("   ", "pw", "pw").await.unwrap_err();

        assert!(matches!(err, ParleyError::Validation(_)));
        assert!(gateway.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_trims_inputs() {
        let gateway = Arc::new(MockAuthGateway::default());
        let (auth, credentials) = usecase(gateway.clone());

        auth.register(" bob ", " pw ", "pw").await.unwrap();

        assert_eq!(*gateway.calls.lock().unwrap(), vec!["register:bob:pw".to_string()]);
        assert_eq!(credentials.credential().await, None);
    }
}
