use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use parley_core::session::SessionStore;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::commands::{COMMANDS, POSITIONAL_COMMANDS};

/// rustyline helper for the chat prompt.
///
/// Completes slash commands, and chat positions after `/open` or `/delete`
/// from the live session list. While `masking` is set (password prompts) the
/// line is drawn as asterisks and nothing is completed or hinted.
pub struct ReplHelper {
    sessions: SessionStore,
    pub masking: bool,
}

impl ReplHelper {
    pub fn new(sessions: SessionStore) -> Self {
        Self {
            sessions,
            masking: false,
        }
    }

    /// Completion start offset and candidates for the text before the cursor.
    fn candidates(&self, line: &str) -> (usize, Vec<Pair>) {
        if self.masking || !line.starts_with('/') {
            return (0, vec![]);
        }

        match line.split_once(' ') {
            None => {
                let commands = COMMANDS
                    .iter()
                    .filter(|cmd| cmd.starts_with(line))
                    .map(|cmd| Pair {
                        display: cmd.to_string(),
                        replacement: cmd.to_string(),
                    })
                    .collect();
                (0, commands)
            }
            Some((command, arg)) if POSITIONAL_COMMANDS.contains(&command) => {
                let positions = self
                    .sessions
                    .sessions()
                    .iter()
                    .enumerate()
                    .map(|(index, session)| ((index + 1).to_string(), &session.title))
                    .filter(|(position, _)| position.starts_with(arg))
                    .map(|(position, title)| Pair {
                        display: format!("{}  {}", position, title),
                        replacement: position,
                    })
                    .collect();
                (line.len() - arg.len(), positions)
            }
            Some(_) => (0, vec![]),
        }
    }
}

impl Helper for ReplHelper {}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(&line[..pos]))
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.masking {
            Owned("*".repeat(line.chars().count()))
        } else if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if !self.masking && line.starts_with('/') && !line.contains(' ') {
            COMMANDS
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for ReplHelper {}
