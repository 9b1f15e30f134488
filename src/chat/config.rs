//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::env;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::chat::state::Theme;
use crate::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, normalize_base_url};
use crate::error::{Error, Result};

/// Environment variable consulted when `--base-url` is not given.
pub const BASE_URL_ENV: &str = "CHATRELAY_BASE_URL";

/// Command-line arguments for the chatrelay tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the conversation backend.
    #[arrrg(optional, "Backend base URL (default: $CHATRELAY_BASE_URL or http://127.0.0.1:5000/)", "URL")]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECONDS")]
    pub timeout: Option<u64>,

    /// Initial theme.
    #[arrrg(optional, "Initial theme: light or dark (default: light)", "THEME")]
    pub theme: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat client.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Base URL both endpoints resolve against.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Theme at start-up.
    pub theme: Theme,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Base URL: http://127.0.0.1:5000/
    /// - Timeout: 60 seconds
    /// - Theme: light
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            theme: Theme::default(),
            use_color: true,
        }
    }

    /// Sets the backend base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the initial theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Resolves arguments, using `env_base_url` when no base URL was given.
    pub fn from_args(args: ChatArgs, env_base_url: Option<String>) -> Result<Self> {
        let theme = match args.theme {
            Some(theme) => theme
                .parse::<Theme>()
                .map_err(|err| Error::validation(err, Some("theme".to_string())))?,
            None => Theme::default(),
        };
        let timeout = match args.timeout {
            Some(0) => {
                return Err(Error::validation(
                    "timeout must be at least one second",
                    Some("timeout".to_string()),
                ));
            }
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_TIMEOUT,
        };
        let base_url = args
            .base_url
            .or(env_base_url.filter(|url| !url.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let config = ChatConfig {
            base_url,
            timeout,
            theme,
            use_color: !args.no_color,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that the base URL can carry the two endpoints.
    pub fn validate(&self) -> Result<()> {
        normalize_base_url(&self.base_url).map(|_| ())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<ChatArgs> for ChatConfig {
    type Error = Error;

    fn try_from(args: ChatArgs) -> Result<Self> {
        ChatConfig::from_args(args, env::var(BASE_URL_ENV).ok())
    }
}
