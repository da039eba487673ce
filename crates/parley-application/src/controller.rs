//! Chat session lifecycle controller.
//!
//! Reconciles the local stores with the remote gateway and serialises every
//! mutating operation through a single busy gate.

use parley_core::auth::CredentialProvider;
use parley_core::error::{ParleyError, Result};
use parley_core::notice::{Notice, NoticeSink};
use parley_core::session::{
    BusyGate, ChatGateway, ChatStores, DEFAULT_SESSION_TITLE, EMPTY_REPLY_PLACEHOLDER, Message,
    MessageStore, Phase, SEND_FAILURE_MESSAGE, Session, SessionStore, StoreWriter,
    title_from_text,
};
use parley_core::state::StateRepository;
use std::sync::Arc;
use tokio::sync::{RwLock, watch};

/// Result of a `send_message` call that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Empty input, or another operation was in flight. Nothing changed.
    Ignored,
    /// The assistant answered; its reply (or the placeholder) was appended.
    Replied,
    /// The chat call failed; a synthetic error reply was appended instead.
    Absorbed,
}

/// Drives the chat session lifecycle on behalf of a UI.
///
/// `ChatSessionController` is responsible for:
/// - Resuming or creating a session on startup
/// - Switching, creating and deleting sessions
/// - Sending messages with an optimistic local append
/// - Rejecting overlapping mutating operations while one is in flight
///
/// It is the only component that talks to the [`ChatGateway`]; the stores it
/// exposes through [`sessions`](Self::sessions) and
/// [`messages`](Self::messages) are read-only for everyone else.
pub struct ChatSessionController {
    /// Remote source of truth
    gateway: Arc<dyn ChatGateway>,
    /// Volatile storage for the active session id
    state_repository: Arc<dyn StateRepository>,
    /// Bearer credential holder
    credentials: Arc<dyn CredentialProvider>,
    /// Toast channel for failures the user should see
    notices: Arc<dyn NoticeSink>,
    stores: ChatStores,
    writer: StoreWriter,
    gate: BusyGate,
    /// Input buffer, cleared when a message is accepted
    draft: RwLock<String>,
}

impl ChatSessionController {
    /// Creates a controller with empty stores.
    ///
    /// Nothing is fetched until [`initialize`](Self::initialize) is called.
    pub fn new(
        gateway: Arc<dyn ChatGateway>,
        state_repository: Arc<dyn StateRepository>,
        credentials: Arc<dyn CredentialProvider>,
        notices: Arc<dyn NoticeSink>,
    ) -> Self {
        let (stores, writer) = ChatStores::new();
        Self {
            gateway,
            state_repository,
            credentials,
            notices,
            stores,
            writer,
            gate: BusyGate::new(),
            draft: RwLock::new(String::new()),
        }
    }

    // ============================================================================
    // Read path
    // ============================================================================

    pub fn sessions(&self) -> &SessionStore {
        &self.stores.sessions
    }

    pub fn messages(&self) -> &MessageStore {
        &self.stores.messages
    }

    /// Cloneable read handles for renderers living elsewhere.
    pub fn stores(&self) -> ChatStores {
        self.stores.clone()
    }

    pub fn phase(&self) -> Phase {
        self.gate.phase()
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<Phase> {
        self.gate.subscribe()
    }

    pub async fn draft(&self) -> String {
        self.draft.read().await.clone()
    }

    pub async fn set_draft(&self, text: impl Into<String>) {
        *self.draft.write().await = text.into();
    }

    // ============================================================================
    // Lifecycle operations
    // ============================================================================

    /// Loads the session list and resumes a session.
    ///
    /// Resumes, in order of preference: the saved active session if the
    /// gateway still lists it, the first listed session, or a freshly
    /// created "New Chat".
    ///
    /// # Returns
    ///
    /// - `Ok(Some(id))`: the session now active
    /// - `Ok(None)`: the gateway failed (already logged and notified) or
    ///   another operation was in flight
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Unauthenticated` when there is no credential or
    /// the gateway rejects it; the caller should send the user to login.
    pub async fn initialize(&self) -> Result<Option<String>> {
        if !self.credentials.has_credential().await {
            return Err(ParleyError::Unauthenticated);
        }

        let Some(_guard) = self.gate.try_acquire() else {
            tracing::debug!("[SessionController] initialize ignored: busy");
            return Ok(None);
        };

        let sessions = match self.gateway.list_sessions().await {
            Ok(sessions) => sessions,
            Err(e) if e.is_unauthenticated() => return Err(e),
            Err(e) => {
                self.report_failure("Failed to load chats", &e);
                return Ok(None);
            }
        };
        self.writer.replace_sessions(sessions.clone());

        let saved = self.state_repository.get_active_session().await;
        let target = saved
            .filter(|id| sessions.iter().any(|s| &s.id == id))
            .or_else(|| sessions.first().map(|s| s.id.clone()));

        match target {
            Some(id) => match self.activate(&id).await {
                Ok(()) => {
                    tracing::info!("[SessionController] Resumed session: {}", id);
                    Ok(Some(id))
                }
                Err(e) if e.is_unauthenticated() => Err(e),
                Err(e) => {
                    self.report_failure("Failed to load chat", &e);
                    Ok(None)
                }
            },
            None => match self.create_and_activate(DEFAULT_SESSION_TITLE).await {
                Ok(id) => Ok(Some(id)),
                Err(e) if e.is_unauthenticated() => Err(e),
                Err(_) => Ok(None),
            },
        }
    }

    /// Switches to another session.
    ///
    /// Returns `true` if the switch happened. Selecting the active session,
    /// or selecting while busy, does nothing and makes no network call. A
    /// failed fetch is logged and notified; the current session stays.
    pub async fn select_session(&self, session_id: &str) -> bool {
        if self.stores.sessions.active_id().as_deref() == Some(session_id) {
            return false;
        }
        let Some(_guard) = self.gate.try_acquire() else {
            tracing::debug!("[SessionController] select ignored: busy");
            return false;
        };

        match self.activate(session_id).await {
            Ok(()) => {
                tracing::info!("[SessionController] Switched to session: {}", session_id);
                true
            }
            Err(e) => {
                self.report_failure("Failed to load chat", &e);
                false
            }
        }
    }

    /// Creates a session and makes it active with an empty thread.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(id))`: the new session id
    /// - `Ok(None)`: ignored because another operation was in flight
    ///
    /// # Errors
    ///
    /// Returns the gateway error (after notifying) if creation fails.
    pub async fn create_session(&self, title: Option<&str>) -> Result<Option<String>> {
        let Some(_guard) = self.gate.try_acquire() else {
            tracing::debug!("[SessionController] create ignored: busy");
            return Ok(None);
        };

        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_SESSION_TITLE);
        self.create_and_activate(title).await.map(Some)
    }

    /// Deletes a session.
    ///
    /// Deleting the active session moves to the first remaining one, or to
    /// a new "New Chat" when none remain. Nothing is removed locally until
    /// the gateway confirms the deletion.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the session was deleted, `Ok(false)` if ignored while busy.
    pub async fn delete_session(&self, session_id: &str) -> Result<bool> {
        let Some(_guard) = self.gate.try_acquire() else {
            tracing::debug!("[SessionController] delete ignored: busy");
            return Ok(false);
        };

        if let Err(e) = self.gateway.delete_session(session_id).await {
            self.report_failure("Failed to delete chat", &e);
            return Err(e);
        }
        tracing::info!("[SessionController] Deleted session: {}", session_id);

        let was_active = self.stores.sessions.active_id().as_deref() == Some(session_id);
        if was_active {
            self.writer.set_active(None);
            self.writer.clear_messages();
            if let Err(e) = self.state_repository.clear_active_session().await {
                tracing::warn!("Failed to clear saved active session: {}", e);
            }
        }

        let remaining = match self.refresh_sessions().await {
            Some(sessions) => sessions,
            None => {
                // The gateway confirmed the delete, so pruning locally is safe.
                let pruned: Vec<Session> = self
                    .stores
                    .sessions
                    .sessions()
                    .into_iter()
                    .filter(|s| s.id != session_id)
                    .collect();
                self.writer.replace_sessions(pruned.clone());
                pruned
            }
        };

        if was_active {
            match remaining.first() {
                Some(first) => {
                    if let Err(e) = self.activate(&first.id).await {
                        self.report_failure("Failed to load chat", &e);
                    }
                }
                None => {
                    // Failure is already reported; the user can still send,
                    // which creates a session on demand.
                    let _ = self.create_and_activate(DEFAULT_SESSION_TITLE).await;
                }
            }
        }

        Ok(true)
    }

    /// Sends a message in the active session.
    ///
    /// Steps, in order: create a session if none is active (titled after the
    /// message), append the user message locally and clear the draft, name
    /// the session after its first message, ask the gateway for a reply and
    /// append it, then refresh the session list.
    ///
    /// A failed chat call never surfaces as an error: a synthetic assistant
    /// reply is appended so every user message is answered.
    ///
    /// # Errors
    ///
    /// Only when a session had to be created and creation failed.
    pub async fn send_message(&self, text: &str) -> Result<SendOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(SendOutcome::Ignored);
        }
        let Some(_guard) = self.gate.try_acquire() else {
            tracing::debug!("[SessionController] send ignored: busy");
            return Ok(SendOutcome::Ignored);
        };

        let session_id = match self.stores.sessions.active_id() {
            Some(id) => id,
            None => self.create_and_activate(&title_from_text(text)).await?,
        };

        let count = self.writer.append_message(Message::user(text));
        self.draft.write().await.clear();

        if count == 1 {
            let title = title_from_text(text);
            if let Err(e) = self.gateway.update_session_title(&session_id, &title).await {
                tracing::warn!("Failed to update chat title for {}: {}", session_id, e);
            }
        }

        let outcome = match self.gateway.send_chat_message(&session_id, text).await {
            Ok(reply) => {
                let reply = if reply.reply.is_empty() {
                    EMPTY_REPLY_PLACEHOLDER.to_string()
                } else {
                    reply.reply
                };
                self.writer.append_message(Message::assistant(reply));
                SendOutcome::Replied
            }
            Err(e) => {
                tracing::error!("Error sending message to {}: {}", session_id, e);
                self.writer
                    .append_message(Message::assistant(SEND_FAILURE_MESSAGE));
                SendOutcome::Absorbed
            }
        };

        self.refresh_sessions().await;
        Ok(outcome)
    }

    /// Sends the current draft. See [`send_message`](Self::send_message).
    pub async fn send_draft(&self) -> Result<SendOutcome> {
        let text = self.draft().await;
        self.send_message(&text).await
    }

    /// Forgets the credential, the saved active session and all local state.
    ///
    /// Returns `Ok(false)` if ignored while busy.
    pub async fn logout(&self) -> Result<bool> {
        let Some(_guard) = self.gate.try_acquire() else {
            return Ok(false);
        };

        self.credentials.clear_credential().await?;
        self.state_repository.clear_active_session().await?;
        self.writer.reset();
        self.draft.write().await.clear();

        tracing::info!("[SessionController] Logged out");
        self.notices.notify(Notice::info("Logged out."));
        Ok(true)
    }

    // ============================================================================
    // Internals (callers must hold the gate)
    // ============================================================================

    /// Fetches a session's messages and makes it active.
    ///
    /// Nothing is written unless the fetch succeeds.
    async fn activate(&self, session_id: &str) -> Result<()> {
        let detail = self.gateway.get_session(session_id).await?;

        self.writer.replace_messages(detail.messages);
        self.writer.set_active(Some(detail.id.clone()));
        self.persist_active(detail.id).await;
        Ok(())
    }

    async fn create_and_activate(&self, title: &str) -> Result<String> {
        let session = match self.gateway.create_session(title).await {
            Ok(session) => session,
            Err(e) if e.is_unauthenticated() => {
                tracing::warn!("[SessionController] Create rejected: not authenticated");
                return Err(e);
            }
            Err(e) => {
                self.report_failure("Failed to create chat", &e);
                return Err(e);
            }
        };
        tracing::info!("[SessionController] Created session: {}", session.id);

        self.writer.set_active(Some(session.id.clone()));
        self.writer.clear_messages();
        self.persist_active(session.id.clone()).await;

        if self.refresh_sessions().await.is_none() && !self.stores.sessions.contains(&session.id)
        {
            let mut sessions = self.stores.sessions.sessions();
            sessions.push(session.clone());
            self.writer.replace_sessions(sessions);
        }

        Ok(session.id)
    }

    /// Best-effort reload of the session list. Failures are only logged.
    async fn refresh_sessions(&self) -> Option<Vec<Session>> {
        match self.gateway.list_sessions().await {
            Ok(sessions) => {
                self.writer.replace_sessions(sessions.clone());
                Some(sessions)
            }
            Err(e) => {
                tracing::warn!("Failed to refresh chat list: {}", e);
                None
            }
        }
    }

    async fn persist_active(&self, session_id: String) {
        if let Err(e) = self.state_repository.set_active_session(session_id).await {
            tracing::warn!("Failed to save active session: {}", e);
        }
    }

    fn report_failure(&self, context: &str, error: &ParleyError) {
        tracing::error!("{}: {}", context, error);
        self.notices
            .notify(Notice::error(format!("{}: {}", context, error.user_message())));
    }
}
