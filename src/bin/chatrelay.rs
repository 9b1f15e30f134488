//! Interactive chat client for a conversation/message backend.
//!
//! This binary provides a REPL that relays each line to the backend and
//! prints the answers as a running transcript.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a backend on the default address
//! chatrelay
//!
//! # Point at another backend
//! chatrelay --base-url https://chat.example.com/
//!
//! # Start dark, without colors (useful for piping output)
//! chatrelay --theme dark --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/reset` - Forget the conversation and clear the transcript
//! - `/theme [light|dark]` - Toggle or set the theme
//! - `/session` - Show the conversation id
//! - `/quit` - Exit the application

use std::io;
use std::sync::{Arc, Mutex};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use chatrelay::{ChatBackend, Error};
use chatrelay::chat::{
    ChatArgs, ChatClient, ChatCommand, ChatConfig, PlainTextRenderer, Renderer, SubmitOutcome,
    help_text, parse_command,
};

/// Environment variable holding the tracing filter.
const LOG_ENV: &str = "CHATRELAY_LOG";

/// Main entry point for the chatrelay application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = ChatArgs::from_command_line_relaxed("chatrelay [OPTIONS]");
    let config = ChatConfig::try_from(args)?;
    tracing::debug!(?config, "configuration resolved");

    let backend = ChatBackend::with_options(Some(config.base_url.clone()), Some(config.timeout))?;
    let mut client = ChatClient::new(backend, config.theme);
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut rl = DefaultEditor::new().map_err(terminal_error)?;

    // The submission currently in flight, if any; Ctrl+C aborts it.
    let in_flight: Arc<Mutex<Option<CancellationToken>>> = Arc::new(Mutex::new(None));
    let in_flight_clone = in_flight.clone();
    ctrlc::set_handler(move || {
        if let Ok(slot) = in_flight_clone.lock()
            && let Some(token) = slot.as_ref()
        {
            token.cancel();
        }
    })?;

    println!("Chat relay ({})", client.backend().base_url());
    println!("Type /help for commands, /quit to exit\n");

    loop {
        let readline = rl.readline("> ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Reset => {
                            client.reset();
                            renderer.clear();
                            renderer.print_info("Conversation reset.");
                        }
                        ChatCommand::ToggleTheme => {
                            let theme = client.toggle_theme();
                            renderer.print_info(&format!("Theme: {theme}"));
                            renderer.print_transcript(theme, client.transcript().entries());
                        }
                        ChatCommand::Theme(theme) => {
                            client.set_theme(theme);
                            renderer.print_info(&format!("Theme: {theme}"));
                            renderer.print_transcript(theme, client.transcript().entries());
                        }
                        ChatCommand::Session => match client.conversation_id() {
                            Some(id) => renderer.print_info(&format!("Conversation: {id}")),
                            None => renderer.print_info("Conversation: (none)"),
                        },
                        ChatCommand::History => {
                            let entries = client.transcript().entries();
                            renderer.print_transcript(client.theme(), entries);
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Stats => {
                            print_stats(&client);
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                set_in_flight(&in_flight, Some(client.cancellation()));
                let result = client.submit(line, &mut renderer).await;
                set_in_flight(&in_flight, None);

                match result {
                    Ok(SubmitOutcome::Answered) => {
                        if let Some(remaining) = client.remaining_messages() {
                            renderer.print_info(&format!("({remaining} messages left)"));
                        }
                    }
                    Ok(SubmitOutcome::Ignored) => {}
                    Err(err) if err.is_aborted() => renderer.print_info("[interrupted]"),
                    // Already in the transcript as a notice.
                    Err(_) => {}
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                let err = terminal_error(err);
                tracing::error!(error = %err, "cannot read input");
                renderer.print_error(&err.to_string());
                break;
            }
        }
    }

    Ok(())
}

fn terminal_error(err: ReadlineError) -> Error {
    match err {
        ReadlineError::Io(source) => Error::io(format!("terminal: {source}"), source),
        other => Error::io(
            format!("terminal: {other}"),
            io::Error::other(other.to_string()),
        ),
    }
}

fn set_in_flight(slot: &Mutex<Option<CancellationToken>>, token: Option<CancellationToken>) {
    if let Ok(mut slot) = slot.lock() {
        *slot = token;
    }
}

fn print_stats(client: &ChatClient<ChatBackend>) {
    let stats = client.stats();
    println!("    Client Statistics:");
    println!("      Backend: {}", client.backend().base_url());
    match stats.conversation_id {
        Some(ref id) => println!("      Conversation: {id}"),
        None => println!("      Conversation: (none)"),
    }
    println!("      Theme: {}", stats.theme);
    println!(
        "      Transcript: {} entries ({} you / {} bot / {} notices)",
        stats.entries, stats.user_entries, stats.bot_entries, stats.notices
    );
    match stats.remaining_messages {
        Some(remaining) => println!("      Remaining messages: {remaining}"),
        None => println!("      Remaining messages: (unknown)"),
    }
    println!(
        "      Requests: {} ({} conversations started)",
        stats.total_requests, stats.sessions_created
    );
}
