//! Output rendering for the chat transcript.
//!
//! This module provides the renderer trait the chat client draws through and
//! a plain-text implementation with theme-aware ANSI styling.

use std::io::{self, Stdout, Write};

use crate::chat::{Sender, Theme, TranscriptEntry};

/// ANSI escape code for bold text.
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// Blue background, bright white text (user turns in either theme).
const ANSI_USER: &str = "\x1b[44;97m";

/// Light gray background, black text (bot turns, light theme).
const ANSI_BOT_LIGHT: &str = "\x1b[47;30m";

/// Dark gray background, bright white text (bot turns, dark theme).
const ANSI_BOT_DARK: &str = "\x1b[100;97m";

/// ANSI escape code for red text (notices and errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code for dim text (informational output).
const ANSI_DIM: &str = "\x1b[2m";

/// Trait for drawing the transcript and client messages.
///
/// The chat client calls [`Renderer::print_entry`] once for every entry it
/// appends, in order. Implementations decide what a theme looks like.
pub trait Renderer: Send {
    /// Draw one transcript entry.
    fn print_entry(&mut self, theme: Theme, entry: &TranscriptEntry);

    /// Print an error message that is not part of the transcript.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Called after the transcript was emptied by a reset.
    fn clear(&mut self) {}

    /// Redraw a whole transcript, e.g. after the theme changed.
    fn print_transcript(&mut self, theme: Theme, entries: &[TranscriptEntry]) {
        for entry in entries {
            self.print_entry(theme, entry);
        }
    }
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
        }
    }

    /// Whether ANSI styling is emitted.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn write_line(&mut self, line: &str) {
        let _ = writeln!(self.stdout, "{line}");
        self.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_entry(&mut self, theme: Theme, entry: &TranscriptEntry) {
        let line = format_entry(theme, entry, self.use_color);
        self.write_line(&line);
    }

    fn print_error(&mut self, error: &str) {
        if self.use_color {
            eprintln!("{ANSI_RED}Error: {error}{ANSI_RESET}");
        } else {
            eprintln!("Error: {error}");
        }
    }

    fn print_info(&mut self, info: &str) {
        if self.use_color {
            self.write_line(&format!("{ANSI_DIM}{info}{ANSI_RESET}"));
        } else {
            self.write_line(info);
        }
    }

    fn clear(&mut self) {
        if self.use_color {
            // Clear the screen and home the cursor.
            let _ = write!(self.stdout, "\x1b[2J\x1b[H");
            self.flush();
        } else {
            self.write_line("----");
        }
    }
}

/// Formats one entry the way [`PlainTextRenderer`] prints it.
pub fn format_entry(theme: Theme, entry: &TranscriptEntry, use_color: bool) -> String {
    let label = match entry.sender {
        Sender::User => "You:",
        Sender::Bot => "Bot:",
        Sender::Notice => "!",
    };
    if !use_color {
        return format!("{label} {}", entry.text);
    }
    let style = match (entry.sender, theme) {
        (Sender::User, _) => ANSI_USER,
        (Sender::Bot, Theme::Light) => ANSI_BOT_LIGHT,
        (Sender::Bot, Theme::Dark) => ANSI_BOT_DARK,
        (Sender::Notice, _) => ANSI_RED,
    };
    format!(
        "{ANSI_BOLD}{label}{ANSI_RESET} {style} {} {ANSI_RESET}",
        entry.text
    )
}
