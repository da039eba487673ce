//! REPL command parsing.

/// Slash commands offered for completion, in help order.
pub const COMMANDS: &[&str] = &[
    "/register", "/login", "/logout", "/new", "/list", "/open", "/delete", "/help", "/quit",
];

/// Commands whose argument is a chat position.
pub const POSITIONAL_COMMANDS: &[&str] = &["/open", "/delete", "/rm"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Register,
    Login,
    Logout,
    /// `/new [title]`
    New(Option<String>),
    List,
    /// `/open <n>`, 1-based position in the listing
    Open(usize),
    /// `/delete <n>`, 1-based position in the listing
    Delete(usize),
    Help,
    Quit,
    /// Any line that is not a command
    Send(String),
    /// A known command with bad arguments; carries the usage line
    Usage(&'static str),
    Unknown(String),
}

impl Command {
    /// Parses one input line. Returns `None` for blank input.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if !line.starts_with('/') {
            return Some(Self::Send(line.to_string()));
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name {
            "/register" => Self::Register,
            "/login" => Self::Login,
            "/logout" => Self::Logout,
            "/new" => Self::New((!rest.is_empty()).then(|| rest.to_string())),
            "/list" | "/ls" => Self::List,
            "/open" => match parse_position(rest) {
                Some(n) => Self::Open(n),
                None => Self::Usage("/open <n>"),
            },
            "/delete" | "/rm" => match parse_position(rest) {
                Some(n) => Self::Delete(n),
                None => Self::Usage("/delete <n>"),
            },
            "/help" | "/?" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        };
        Some(command)
    }

    /// Whether the command needs a logged-in user.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            Self::New(_) | Self::List | Self::Open(_) | Self::Delete(_) | Self::Send(_)
        )
    }
}

fn parse_position(arg: &str) -> Option<usize> {
    arg.parse::<usize>().ok().filter(|n| *n > 0)
}

pub const HELP: &[(&str, &str)] = &[
    ("/register", "create an account"),
    ("/login", "log in"),
    ("/logout", "log out and forget local state"),
    ("/new [title]", "start a new chat"),
    ("/list", "list chats"),
    ("/open <n>", "switch to chat n"),
    ("/delete <n>", "delete chat n"),
    ("/help", "show this help"),
    ("/quit", "exit"),
];
