use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Response body of `POST /message`.
///
/// The backend answers with either an `answer` or, once the conversation's
/// quota is spent, an `error`. Both arrive with a success status.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MessageReply {
    /// The bot's answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,

    /// Messages left in the conversation after this one.
    ///
    /// Older backends name this field `available_messages`. The backend does
    /// not stop a conversation at its limit, so the count goes negative once
    /// a conversation runs past it.
    #[serde(
        default,
        alias = "available_messages",
        skip_serializing_if = "Option::is_none"
    )]
    pub remaining_messages: Option<i64>,

    /// Reason the backend refused to answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageReply {
    /// Creates a reply carrying an answer.
    pub fn answer(answer: impl Into<String>) -> Self {
        Self {
            answer: Some(answer.into()),
            ..Self::default()
        }
    }

    /// Creates a reply carrying a refusal.
    pub fn refusal(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Sets the reported quota.
    pub fn with_remaining_messages(mut self, remaining: i64) -> Self {
        self.remaining_messages = Some(remaining);
        self
    }

    /// Returns the answer text, or the reason there is none.
    ///
    /// A refusal takes precedence over an answer.
    pub fn into_answer(self) -> Result<String> {
        if let Some(error) = self.error {
            return Err(Error::rejected(error));
        }
        self.answer
            .ok_or_else(|| Error::serialization("reply is missing the `answer` field", None))
    }
}
