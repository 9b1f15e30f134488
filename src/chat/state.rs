//! Client-side state: the session identifier, the transcript and the theme.
//!
//! Everything here is plain data owned by a single [`ChatState`]; the
//! controller in [`super::session`] is the only writer.

use std::fmt;
use std::str::FromStr;

use crate::types::ConversationId;

/// Who a transcript entry is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    /// Text the user submitted.
    User,
    /// An answer returned by the backend.
    Bot,
    /// A client-generated notice, e.g. a failed request.
    Notice,
}

/// One displayed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    /// Text as displayed.
    pub text: String,
    /// Who said it.
    pub sender: Sender,
}

impl TranscriptEntry {
    /// Creates an entry.
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
        }
    }

    /// Creates a user entry.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User)
    }

    /// Creates a bot entry.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Bot)
    }

    /// Creates a notice entry.
    pub fn notice(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Notice)
    }
}

/// Ordered, append-only list of displayed turns.
///
/// Entries are never removed individually; [`Transcript::clear`] empties it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Appends an entry and returns a reference to it.
    pub fn push(&mut self, entry: TranscriptEntry) -> &TranscriptEntry {
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been displayed since the last reset.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in display order.
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    /// Number of entries attributed to `sender`.
    pub fn count(&self, sender: Sender) -> usize {
        self.entries.iter().filter(|e| e.sender == sender).count()
    }
}

/// Presentation theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    /// Light background palette.
    #[default]
    Light,
    /// Dark background palette.
    Dark,
}

impl Theme {
    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{other}' (use light or dark)")),
        }
    }
}

/// Everything the chat client remembers between submissions.
///
/// `conversation_id` is `None` until the first successful creation and goes
/// back to `None` only through [`ChatState::reset`], which also empties the
/// transcript. The theme survives resets.
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    conversation_id: Option<ConversationId>,
    transcript: Transcript,
    theme: Theme,
    remaining_messages: Option<i64>,
}

impl ChatState {
    /// Creates a state with no session, an empty transcript and the given theme.
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }

    /// The active session identifier, if any.
    pub fn conversation_id(&self) -> Option<&ConversationId> {
        self.conversation_id.as_ref()
    }

    /// Stores the identifier returned by the backend.
    pub fn establish(&mut self, id: ConversationId) {
        self.conversation_id = Some(id);
    }

    /// The transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Appends an entry to the transcript.
    pub fn append(&mut self, entry: TranscriptEntry) -> &TranscriptEntry {
        self.transcript.push(entry)
    }

    /// The current theme.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Sets the theme.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Flips the theme and returns the new one.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// Messages the backend last said remain, if it said.
    pub fn remaining_messages(&self) -> Option<i64> {
        self.remaining_messages
    }

    /// Records the backend's quota report. `None` leaves the last value.
    pub fn record_remaining(&mut self, remaining: Option<i64>) {
        if remaining.is_some() {
            self.remaining_messages = remaining;
        }
    }

    /// Drops the session, the transcript and the quota together.
    pub fn reset(&mut self) {
        self.conversation_id = None;
        self.transcript.clear();
        self.remaining_messages = None;
    }
}
