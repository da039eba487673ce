//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: Session types (`Session`, `SessionDetail`, `ChatReply`)
//! - `message`: Conversation message types (`MessageRole`, `Message`)
//! - `gateway`: Remote REST contract (`ChatGateway`)
//! - `store`: Observable stores (`SessionStore`, `MessageStore`, `StoreWriter`)
//! - `busy`: Single-flight gate (`BusyGate`, `Phase`)

mod busy;
mod gateway;
mod message;
mod model;
mod store;

pub use busy::{BusyGate, BusyGuard, Phase};
pub use gateway::ChatGateway;
pub use message::{EMPTY_REPLY_PLACEHOLDER, Message, MessageRole, SEND_FAILURE_MESSAGE};
pub use model::{
    ChatReply, DEFAULT_SESSION_TITLE, Session, SessionDetail, TITLE_MAX_CHARS, title_from_text,
};
pub use store::{ChatStores, MessageStore, SessionListing, SessionStore, StoreWriter};
