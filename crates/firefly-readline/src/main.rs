mod commands;
mod helper;

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use firefly_application::{AppContext, ChatUseCase, bootstrap};
use firefly_core::session::{ChatMessage, DeliveryStatus, MessageRole, SessionId};
use firefly_core::store::Outcome;
use firefly_infrastructure::{ConfigService, FireflyPaths};

use commands::Command;
use helper::CliHelper;

type Repl = Editor<CliHelper, DefaultHistory>;

/// Root override for every FireflyChat file (config, archive, logs).
const ENV_FIREFLY_HOME: &str = "FIREFLY_HOME";

/// Installs a non-blocking, daily-rolling file subscriber.
///
/// The returned guard must be kept alive to flush buffered log lines.
fn init_logging(logs_dir: &Path) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(logs_dir, "firefly.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    guard
}

fn resolve_paths() -> Result<FireflyPaths> {
    match std::env::var_os(ENV_FIREFLY_HOME) {
        Some(root) => Ok(FireflyPaths::with_root(root)),
        None => Ok(FireflyPaths::resolve()?),
    }
}

fn print_help() {
    println!("{}", "Type a message to chat, or use a command:".bright_black());
    for (line, text) in [
        ("/new", "start a new chat session"),
        ("/sessions", "list stored sessions"),
        ("/open <id>", "open a stored session"),
        ("/delete <id>", "delete a stored session"),
        ("/rename <id>", "rename a stored session"),
        ("/clear", "clear the current conversation"),
        ("/help", "show this help"),
        ("quit", "exit"),
    ] {
        println!("  {:<14}{}", line.bright_cyan(), text.bright_black());
    }
}

fn print_message(message: &ChatMessage) {
    match message.role {
        MessageRole::User => {
            let marker = if message.status == DeliveryStatus::Failed {
                " (not sent)".red().to_string()
            } else {
                String::new()
            };
            println!("{}{}", format!("> {}", message.content).green(), marker);
        }
        MessageRole::Assistant => {
            for line in message.content.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
}

fn print_unavailable<T>(outcome: &Outcome<T>, action: &str) {
    match outcome {
        Outcome::Done(_) => {}
        Outcome::NotConnected => {
            println!("{}", "Not connected: set OPENAI_API_KEY and restart.".yellow());
        }
        Outcome::Busy => println!("{}", "Another operation is still running.".yellow()),
        Outcome::Rejected => println!("{}", format!("Nothing to {action}.").bright_black()),
        Outcome::Failed => {
            println!("{}", format!("Failed to {action}. See the log for details.").red());
        }
    }
}

async fn print_sessions(usecase: &ChatUseCase) {
    let outcome = usecase.registry().refresh().await;
    print_unavailable(&outcome, "list sessions");

    let sessions = usecase.registry().sessions().await;
    if sessions.is_empty() {
        println!("{}", "No sessions yet.".bright_black());
        return;
    }

    let active = usecase.conversation().session_id().await;
    for session in sessions {
        let marker = if Some(session.id) == active { "*" } else { " " };
        println!(
            "{} {:>4}  {}  {}",
            marker.bright_green(),
            session.id.to_string().bright_cyan(),
            session.title,
            session
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }
}

/// Runs the rename dialog for one session until it is saved or cancelled.
async fn rename_session(rl: &mut Repl, usecase: &ChatUseCase, session_id: SessionId) {
    if !usecase.begin_rename(session_id).await {
        println!(
            "{}",
            format!("Session {session_id} is not in the list. Try /sessions first.").yellow()
        );
        return;
    }

    loop {
        let dialog = usecase.registry().rename_dialog().await;
        if let Some(error) = &dialog.error {
            println!("{}", error.red());
        }

        let line = match rl.readline_with_initial("New title: ", (dialog.edit_title.as_str(), "")) {
            Ok(line) => line,
            Err(_) => {
                usecase.cancel_rename().await;
                println!("{}", "Rename cancelled.".bright_black());
                return;
            }
        };

        usecase.set_rename_title(line).await;
        match usecase.submit_rename().await {
            Ok(Outcome::Done(result)) if result.success => {
                let title = result.title.unwrap_or_default();
                println!("{}", format!("Renamed to \"{title}\".").bright_green());
                return;
            }
            Ok(Outcome::Done(_)) => continue,
            Ok(Outcome::Rejected) => {
                println!("{}", "Title cannot be empty.".yellow());
            }
            Ok(other) => {
                print_unavailable(&other, "rename the session");
                usecase.cancel_rename().await;
                return;
            }
            Err(e) => {
                eprintln!("{}", format!("Rename failed: {e}").red());
                usecase.cancel_rename().await;
                return;
            }
        }
    }
}

/// Executes one command. Returns false when the REPL should exit.
async fn run_command(rl: &mut Repl, usecase: &ChatUseCase, command: Command) -> bool {
    match command {
        Command::Quit => return false,
        Command::Help => print_help(),
        Command::Send(text) => {
            println!("{}", "...".bright_black());
            match usecase.send(&text).await {
                Outcome::Done(reply) => print_message(&ChatMessage::assistant(reply)),
                other => print_unavailable(&other, "send the message"),
            }
        }
        Command::New => match usecase.new_chat().await {
            Outcome::Done(id) => println!("{}", format!("Started session {id}.").bright_green()),
            other => print_unavailable(&other, "create a session"),
        },
        Command::Sessions => print_sessions(usecase).await,
        Command::Open(id) => match usecase.open_session(id).await {
            Outcome::Done(_) => {
                println!("{}", format!("=== Session {id} ===").bright_magenta());
                for message in usecase.conversation().messages().await {
                    print_message(&message);
                }
            }
            other => print_unavailable(&other, "open the session"),
        },
        Command::Delete(id) => match usecase.delete_session(id).await {
            Outcome::Done(_) => println!("{}", format!("Deleted session {id}.").bright_green()),
            other => print_unavailable(&other, "delete the session"),
        },
        Command::Rename(id) => rename_session(rl, usecase, id).await,
        Command::Clear => {
            usecase.clear_conversation().await;
            println!("{}", "Conversation cleared.".bright_black());
        }
        Command::Usage(usage) => println!("{}", usage.yellow()),
        Command::Unknown(name) => {
            println!("{}", format!("Unknown command: {name}. Type /help.").bright_black());
        }
    }
    true
}

/// The main entry point for the FireflyChat REPL.
///
/// 1. Resolves paths and installs file logging
/// 2. Loads `config.toml` with environment overrides
/// 3. Wires the stores to the local backend (disconnected without an API key)
/// 4. Reads commands until `quit` or EOF
#[tokio::main]
async fn main() -> Result<()> {
    let paths = resolve_paths()?;
    paths.ensure_dirs()?;
    let _log_guard = init_logging(&paths.logs_dir());

    let config_service = ConfigService::from_paths(&paths);
    let config = config_service.get_config()?;
    let config_path = config_service.path().to_path_buf();

    let AppContext {
        config,
        connection,
        usecase,
        ..
    } = bootstrap(paths, config);

    println!(
        "{}",
        format!("=== {} v{} ===", config.app_name, config.app_version)
            .bright_magenta()
            .bold()
    );
    if !connection.is_connected() {
        println!(
            "{}",
            format!(
                "No OpenAI API key configured. Set OPENAI_API_KEY or [openai].api_key in {}.",
                config_path.display()
            )
            .yellow()
        );
    } else if let Outcome::Done(count) = usecase.startup().await {
        println!("{}", format!("{count} stored sessions. Type /help for commands.").bright_black());
    }
    println!();

    let mut rl: Repl = Editor::new()?;
    rl.set_helper(Some(CliHelper));

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let Some(command) = Command::parse(&line) else {
                    continue;
                };
                let _ = rl.add_history_entry(line.trim());
                if !run_command(&mut rl, &usecase, command).await {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    tracing::info!("[Main] REPL exited");
    Ok(())
}
