use serde::{Deserialize, Serialize};

use crate::types::ConversationId;

/// Response body of `POST /conversation`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    /// Identifier to send with every subsequent message.
    pub conversation_id: ConversationId,

    /// Number of messages the backend will accept in this conversation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_messages: Option<i64>,
}

impl Conversation {
    /// Creates a conversation with no reported quota.
    pub fn new(conversation_id: impl Into<ConversationId>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            remaining_messages: None,
        }
    }

    /// Sets the reported quota.
    pub fn with_remaining_messages(mut self, remaining: i64) -> Self {
        self.remaining_messages = Some(remaining);
        self
    }
}
