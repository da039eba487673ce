//! Terminal rendering of stores and notices.

use colored::Colorize;
use parley_core::notice::{Notice, NoticeLevel};
use parley_core::session::{Message, MessageRole, SessionListing};
use tokio::sync::mpsc;

use crate::commands::HELP;

pub fn banner() {
    println!("{}", "=== Parley ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a message to chat, '/help' for commands, or '/quit' to exit.".bright_black()
    );
    println!();
}

pub fn help() {
    for (usage, description) in HELP {
        println!("  {:<14} {}", usage.bright_cyan(), description.bright_black());
    }
}

/// Prints the session list with the active one marked.
pub fn sessions(listing: &SessionListing) {
    if listing.sessions.is_empty() {
        println!("{}", "No chats yet.".bright_black());
        return;
    }
    let active = listing.active_id.as_deref();
    for (index, session) in listing.sessions.iter().enumerate() {
        let line = format!("{:>3}. {}", index + 1, session.title);
        if Some(session.id.as_str()) == active {
            println!("{} {}", "*".bright_green(), line.bright_green().bold());
        } else {
            println!("  {}", line);
        }
    }
}

pub fn thread(title: Option<&str>, messages: &[Message]) {
    if let Some(title) = title {
        println!("{}", format!("--- {} ---", title).bright_magenta());
    }
    if messages.is_empty() {
        println!("{}", "(empty chat)".bright_black());
    }
    for message in messages {
        self::message(message);
    }
}

pub fn message(message: &Message) {
    match message.role {
        MessageRole::User => {
            for line in message.text.lines() {
                println!("{}", format!("> {}", line).green());
            }
        }
        MessageRole::Assistant => {
            for line in message.text.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
}

pub fn thinking() {
    println!("{}", "Thinking...".bright_black().italic());
}

pub fn info(text: &str) {
    println!("{}", text.bright_yellow());
}

pub fn error(text: &str) {
    eprintln!("{}", text.red());
}

/// Prints every notice queued since the last call.
pub fn drain_notices(receiver: &mut mpsc::UnboundedReceiver<Notice>) {
    while let Ok(notice) = receiver.try_recv() {
        match notice.level {
            NoticeLevel::Info => info(&notice.message),
            NoticeLevel::Error => error(&notice.message),
        }
    }
}
