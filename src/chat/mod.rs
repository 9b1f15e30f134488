//! Chat client module for conversing with a conversation/message backend.
//!
//! This module provides an interactive chat client built on top of the
//! [`Backend`](crate::client::Backend) trait. It supports:
//!
//! - Lazy conversation creation on the first message
//! - A transcript of user, bot and notice entries
//! - Light and dark themes
//! - Slash commands for resetting and theming
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`state`]: Session identifier, transcript and theme
//! - [`session`]: The controller that drives the backend exchange
//! - [`commands`]: Slash command parsing

mod commands;
mod config;
mod session;
mod state;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{BASE_URL_ENV, ChatArgs, ChatConfig};
pub use session::{ChatClient, ChatStats, SubmitOutcome};
pub use state::{ChatState, Sender, Theme, Transcript, TranscriptEntry};
