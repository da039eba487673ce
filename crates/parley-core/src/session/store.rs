//! Observable session and message stores.
//!
//! Both stores are thin wrappers over `tokio::sync::watch` channels: any
//! number of renderers can read a snapshot or subscribe to changes, while a
//! single [`StoreWriter`] (owned by the session controller) mutates them.

use super::message::Message;
use super::model::Session;
use std::sync::Arc;
use tokio::sync::watch;

/// Sessions known to the client plus the currently active one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionListing {
    /// Sessions in the gateway's listing order
    pub sessions: Vec<Session>,
    /// Id of the active session, if any
    pub active_id: Option<String>,
}

impl SessionListing {
    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.iter().any(|s| s.id == session_id)
    }

    pub fn active(&self) -> Option<&Session> {
        let id = self.active_id.as_deref()?;
        self.sessions.iter().find(|s| s.id == id)
    }
}

/// Read handle on the session list.
#[derive(Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<SessionListing>>,
}

impl SessionStore {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionListing::default());
        Self { tx: Arc::new(tx) }
    }

    /// Returns a copy of the current listing.
    pub fn snapshot(&self) -> SessionListing {
        self.tx.borrow().clone()
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.tx.borrow().sessions.clone()
    }

    pub fn active_id(&self) -> Option<String> {
        self.tx.borrow().active_id.clone()
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.tx.borrow().contains(session_id)
    }

    /// Subscribes to listing changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionListing> {
        self.tx.subscribe()
    }

    pub(crate) fn replace_sessions(&self, sessions: Vec<Session>) {
        self.tx.send_modify(|listing| listing.sessions = sessions);
    }

    pub(crate) fn set_active(&self, session_id: Option<String>) {
        self.tx.send_modify(|listing| listing.active_id = session_id);
    }

    pub(crate) fn clear(&self) {
        self.tx.send_replace(SessionListing::default());
    }
}

/// Read handle on the active session's messages.
#[derive(Clone)]
pub struct MessageStore {
    tx: Arc<watch::Sender<Vec<Message>>>,
}

impl MessageStore {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self { tx: Arc::new(tx) }
    }

    /// Returns a copy of the messages in insertion order.
    pub fn snapshot(&self) -> Vec<Message> {
        self.tx.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_empty()
    }

    /// Subscribes to message changes.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Message>> {
        self.tx.subscribe()
    }

    pub(crate) fn replace(&self, messages: Vec<Message>) {
        self.tx.send_replace(messages);
    }

    /// Appends a message and returns the new length.
    pub(crate) fn append(&self, message: Message) -> usize {
        let mut len = 0;
        self.tx.send_modify(|messages| {
            messages.push(message);
            len = messages.len();
        });
        len
    }

    pub(crate) fn clear(&self) {
        self.tx.send_replace(Vec::new());
    }
}

/// Read handles on both stores, cheap to clone and hand to renderers.
#[derive(Clone)]
pub struct ChatStores {
    pub sessions: SessionStore,
    pub messages: MessageStore,
}

/// The only write path into a [`ChatStores`] pair.
///
/// Created together with the stores by [`ChatStores::new`]; the controller
/// keeps it and hands out the read side.
pub struct StoreWriter {
    stores: ChatStores,
}

impl ChatStores {
    /// Creates an empty pair of stores and the writer that owns them.
    pub fn new() -> (Self, StoreWriter) {
        let stores = Self {
            sessions: SessionStore::new(),
            messages: MessageStore::new(),
        };
        let writer = StoreWriter {
            stores: stores.clone(),
        };
        (stores, writer)
    }
}

impl StoreWriter {
    pub fn replace_sessions(&self, sessions: Vec<Session>) {
        self.stores.sessions.replace_sessions(sessions);
    }

    pub fn set_active(&self, session_id: Option<String>) {
        self.stores.sessions.set_active(session_id);
    }

    pub fn replace_messages(&self, messages: Vec<Message>) {
        self.stores.messages.replace(messages);
    }

    pub fn append_message(&self, message: Message) -> usize {
        self.stores.messages.append(message)
    }

    pub fn clear_messages(&self) {
        self.stores.messages.clear();
    }

    /// Empties both stores.
    pub fn reset(&self) {
        self.stores.sessions.clear();
        self.stores.messages.clear();
    }
}
