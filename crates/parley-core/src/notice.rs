//! User-visible notices (the toast channel).

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A short message meant for the user rather than the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}

/// Destination for notices; rendering is the sink's business.
pub trait NoticeSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Forwards notices over an unbounded channel to whoever renders them.
pub struct ChannelNoticeSink {
    sender: mpsc::UnboundedSender<Notice>,
}

impl ChannelNoticeSink {
    pub fn new(sender: mpsc::UnboundedSender<Notice>) -> Self {
        Self { sender }
    }

    /// Creates a sink together with the receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl NoticeSink for ChannelNoticeSink {
    fn notify(&self, notice: Notice) {
        // Receiver gone means nobody is rendering; the notice is dropped.
        let _ = self.sender.send(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink_delivers_in_order() {
        let (sink, mut rx) = ChannelNoticeSink::channel();
        sink.notify(Notice::error("first"));
        sink.notify(Notice::info("second"));

        let first = rx.try_recv().unwrap();
        assert_eq!(first.level, NoticeLevel::Error);
        assert_eq!(first.message, "first");
        assert_eq!(rx.try_recv().unwrap().message, "second");
    }

    #[test]
    fn test_notify_without_receiver_does_not_panic() {
        let (sink, rx) = ChannelNoticeSink::channel();
        drop(rx);
        sink.notify(Notice::info("nobody listening"));
    }
}
