//! Session domain model.
//!
//! The remote gateway owns sessions; these types are the client's cached view.

use super::message::Message;
use serde::{Deserialize, Serialize};

/// Title given to sessions created without an explicit one.
pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

/// Maximum number of characters taken from a message when deriving a title.
pub const TITLE_MAX_CHARS: usize = 30;

/// A named conversation thread as listed by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque identifier assigned by the gateway
    pub id: String,
    /// Human-readable session title
    pub title: String,
}

impl Session {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// A session together with its full message history.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionDetail {
    pub id: String,
    pub messages: Vec<Message>,
}

/// Assistant answer returned by the chat-completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Derives a session title from the first characters of `text`.
///
/// Counts characters rather than bytes so multi-byte input is never split.
pub fn title_from_text(text: &str) -> String {
    text.chars().take(TITLE_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_short_text() {
        assert_eq!(title_from_text("Hello"), "Hello");
    }

    #[test]
    fn test_title_truncates_to_thirty_chars() {
        let text = "abcdefghijklmnopqrstuvwxyz0123456789";
        assert_eq!(title_from_text(text), "abcdefghijklmnopqrstuvwxyz0123");
    }

    #[test]
    fn test_title_counts_chars_not_bytes() {
        let text = "é".repeat(40);
        let title = title_from_text(&text);
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS);
    }
}
