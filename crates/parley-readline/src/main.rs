use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use parley_application::{AuthUseCase, ChatSessionController, SendOutcome};
use parley_core::ParleyError;
use parley_core::auth::CredentialProvider;
use parley_core::config::ClientConfig;
use parley_core::notice::{ChannelNoticeSink, Notice};
use parley_core::session::{Phase, Session};
use parley_infrastructure::config_service::{API_URL_ENV, LOG_LEVEL_ENV};
use parley_infrastructure::{
    ApiClient, ConfigService, HttpAuthGateway, HttpChatGateway, ParleyPaths, SessionStorage,
};

mod commands;
mod helper;
mod render;

use commands::Command;
use helper::ReplHelper;

type ReplEditor = Editor<ReplHelper, DefaultHistory>;

#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "Parley - terminal chat client", long_about = None)]
struct Args {
    /// Backend base URL (overrides config.toml and PARLEY_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Log filter used when RUST_LOG is unset (overrides config.toml and PARLEY_LOG)
    #[arg(long)]
    log_level: Option<String>,

    /// Path to an alternate config.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    let _log_guard = init_logging(&config.log_level);
    tracing::info!("[Bootstrap] Backend: {}", config.api_url);

    // ===== Wiring =====
    let storage = SessionStorage::new();
    let credentials: Arc<dyn CredentialProvider> = Arc::new(storage.clone());
    let api = ApiClient::new(config.api_url.clone());

    let auth = AuthUseCase::new(
        Arc::new(HttpAuthGateway::new(api.clone())),
        Arc::clone(&credentials),
    );
    let (sink, notices) = ChannelNoticeSink::channel();
    let controller = ChatSessionController::new(
        Arc::new(HttpChatGateway::new(api, Arc::clone(&credentials))),
        Arc::new(storage),
        credentials,
        Arc::new(sink),
    );

    // ===== REPL =====
    let mut rl: ReplEditor = Editor::new()?;
    rl.set_helper(Some(ReplHelper::new(controller.sessions().clone())));

    render::banner();
    render::info("Log in with /login, or create an account with /register.");

    let mut repl = Repl {
        controller,
        auth,
        notices,
    };
    repl.run(&mut rl).await;

    tracing::info!("[Bootstrap] Exiting");
    Ok(())
}

/// Config file, then environment, then command-line flags.
fn load_config(args: &Args) -> Result<ClientConfig> {
    let service = match &args.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(),
    };
    let config = service.load_with(|key| flag_or_env(args, key, |k| std::env::var(k).ok()))?;
    Ok(config)
}

/// Flags are layered over the environment so they pass the same validation.
fn flag_or_env(args: &Args, key: &str, env: impl Fn(&str) -> Option<String>) -> Option<String> {
    let flag = match key {
        API_URL_ENV => args.api_url.clone(),
        LOG_LEVEL_ENV => args.log_level.clone(),
        _ => None,
    };
    flag.or_else(|| env(key))
}

/// Logs go to a daily file so they never interleave with the prompt.
///
/// The returned guard flushes the writer on drop and must outlive the REPL.
fn init_logging(level: &str) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let log_dir = ParleyPaths::log_dir()
        .ok()
        .filter(|dir| std::fs::create_dir_all(dir).is_ok());
    let Some(log_dir) = log_dir else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .try_init();
        return None;
    };

    let appender = tracing_appender::rolling::daily(log_dir, "parley.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    Some(guard)
}

struct Repl {
    controller: ChatSessionController,
    auth: AuthUseCase,
    notices: mpsc::UnboundedReceiver<Notice>,
}

impl Repl {
    async fn run(&mut self, rl: &mut ReplEditor) {
        loop {
            let prompt = self.prompt();
            let line = match rl.readline(&prompt) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    render::info("CTRL-C detected. Type '/quit' to exit.");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    render::error(&format!("Error: {:?}", err));
                    break;
                }
            };

            let Some(command) = Command::parse(&line) else {
                continue;
            };
            let _ = rl.add_history_entry(line.as_str());

            if command == Command::Quit {
                break;
            }
            if command.requires_login() && !self.auth.is_authenticated().await {
                render::error("Please log in first (/login).");
                continue;
            }

            if let Err(e) = self.dispatch(command, rl).await {
                self.handle_error(e).await;
            }
            render::drain_notices(&mut self.notices);
        }
        println!("Goodbye!");
    }

    fn prompt(&self) -> String {
        match self.controller.sessions().snapshot().active() {
            Some(session) => format!("[{}] >> ", session.title),
            None => ">> ".to_string(),
        }
    }

    async fn dispatch(&mut self, command: Command, rl: &mut ReplEditor) -> parley_core::Result<()> {
        match command {
            Command::Register => self.register(rl).await,
            Command::Login => self.login(rl).await,
            Command::Logout => {
                self.controller.logout().await?;
                Ok(())
            }
            Command::New(title) => {
                if self.controller.create_session(title.as_deref()).await?.is_some() {
                    self.show_thread();
                }
                Ok(())
            }
            Command::List => {
                render::sessions(&self.controller.sessions().snapshot());
                Ok(())
            }
            Command::Open(position) => {
                if let Some(session) = self.session_at(position) {
                    let switched = self.controller.select_session(&session.id).await;
                    if switched || self.controller.sessions().active_id() == Some(session.id) {
                        self.show_thread();
                    }
                }
                Ok(())
            }
            Command::Delete(position) => {
                if let Some(session) = self.session_at(position) {
                    if self.controller.delete_session(&session.id).await? {
                        render::info(&format!("Deleted \"{}\".", session.title));
                        render::sessions(&self.controller.sessions().snapshot());
                    }
                }
                Ok(())
            }
            Command::Send(text) => {
                self.controller.set_draft(text).await;
                match self.send_draft().await? {
                    SendOutcome::Replied | SendOutcome::Absorbed => {
                        if let Some(reply) = self.controller.messages().snapshot().last() {
                            render::message(reply);
                        }
                    }
                    SendOutcome::Ignored => {}
                }
                Ok(())
            }
            Command::Help => {
                render::help();
                Ok(())
            }
            Command::Usage(usage) => {
                render::error(&format!("Usage: {}", usage));
                Ok(())
            }
            Command::Unknown(name) => {
                render::error(&format!("Unknown command: {} (try /help)", name));
                Ok(())
            }
            Command::Quit => Ok(()),
        }
    }

    async fn register(&self, rl: &mut ReplEditor) -> parley_core::Result<()> {
        let Some(user_id) = ask(rl, "User ID: ") else { return Ok(()) };
        let Some(password) = ask_secret(rl, "Password: ") else { return Ok(()) };
        let Some(confirmation) = ask_secret(rl, "Confirm password: ") else { return Ok(()) };

        match self.auth.register(&user_id, &password, &confirmation).await {
            Ok(()) => render::info("Account created. Log in with /login."),
            Err(e) => render::error(&e.user_message()),
        }
        Ok(())
    }

    async fn login(&self, rl: &mut ReplEditor) -> parley_core::Result<()> {
        let Some(user_id) = ask(rl, "User ID: ") else { return Ok(()) };
        let Some(password) = ask_secret(rl, "Password: ") else { return Ok(()) };

        if let Err(e) = self.auth.login(&user_id, &password).await {
            render::error(&e.user_message());
            return Ok(());
        }
        render::info(&format!("Welcome, {}.", user_id.trim()));

        if self.controller.initialize().await?.is_some() {
            self.show_thread();
        }
        Ok(())
    }

    /// Sends the draft, printing "Thinking..." once the controller goes busy.
    async fn send_draft(&self) -> parley_core::Result<SendOutcome> {
        let mut phase = self.controller.subscribe_phase();
        let send = self.controller.send_draft();
        tokio::pin!(send);

        tokio::select! {
            outcome = &mut send => outcome,
            Ok(()) = phase.changed() => {
                let busy = *phase.borrow_and_update() == Phase::Busy;
                if busy {
                    render::thinking();
                }
                send.await
            }
        }
    }

    async fn handle_error(&self, e: ParleyError) {
        if e.is_unauthenticated() {
            let _ = self.controller.logout().await;
            render::error("Your session has expired. Please /login again.");
            return;
        }
        // Gateway failures were already reported through the notice channel.
        if !(e.is_gateway_failure() || e.is_not_found()) {
            render::error(&e.user_message());
        }
    }

    fn session_at(&self, position: usize) -> Option<Session> {
        let session = self
            .controller
            .sessions()
            .sessions()
            .into_iter()
            .nth(position - 1);
        if session.is_none() {
            render::error(&format!("No chat #{} (see /list).", position));
        }
        session
    }

    fn show_thread(&self) {
        let listing = self.controller.sessions().snapshot();
        let messages = self.controller.messages().snapshot();
        render::thread(listing.active().map(|s| s.title.as_str()), &messages);
    }
}

/// Reads one field; `None` when the user cancels.
fn ask(rl: &mut ReplEditor, label: &str) -> Option<String> {
    match rl.readline(label) {
        Ok(value) => Some(value),
        Err(_) => {
            render::info("Cancelled.");
            None
        }
    }
}

/// Like [`ask`], with the input drawn as asterisks.
fn ask_secret(rl: &mut ReplEditor, label: &str) -> Option<String> {
    set_masking(rl, true);
    let value = ask(rl, label);
    set_masking(rl, false);
    value
}

fn set_masking(rl: &mut ReplEditor, masking: bool) {
    if let Some(helper) = rl.helper_mut() {
        helper.masking = masking;
    }
}
