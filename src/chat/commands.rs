//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat client without sending messages
//! to the backend.

use crate::chat::state::Theme;

/// A parsed chat command.
///
/// These commands control the chat client and are not sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Forget the conversation and clear the transcript.
    Reset,

    /// Flip between light and dark.
    ToggleTheme,

    /// Switch to a specific theme.
    Theme(Theme),

    /// Show the current conversation identifier.
    Session,

    /// Redraw the transcript.
    History,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Display client statistics.
    Stats,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a valid command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use chatrelay::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/theme dark").is_some());
/// assert!(parse_command("Hello there!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    let rest = input.strip_prefix('/')?;
    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "reset" | "clear" | "new" => ChatCommand::Reset,
        "theme" => match argument {
            None => ChatCommand::ToggleTheme,
            Some(arg) if arg.eq_ignore_ascii_case("toggle") => ChatCommand::ToggleTheme,
            Some(arg) => match arg.parse::<Theme>() {
                Ok(theme) => ChatCommand::Theme(theme),
                Err(err) => ChatCommand::Invalid(format!("/theme: {err}")),
            },
        },
        "session" => ChatCommand::Session,
        "history" => ChatCommand::History,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        "stats" | "status" => ChatCommand::Stats,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /reset                 Start over: forget the conversation and clear the transcript
  /theme [light|dark]    Toggle the theme, or switch to the one given
  /session               Show the current conversation id
  /history               Redraw the transcript
  /stats                 Show client statistics
  /help                  Show this help message
  /quit                  Exit the chat"#
}
