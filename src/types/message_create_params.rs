use serde::{Deserialize, Serialize};

use crate::types::ConversationId;

/// Request body for `POST /message`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageCreateParams {
    /// The conversation this message belongs to.
    pub conversation_id: ConversationId,

    /// The user's message text.
    pub user_input: String,
}

impl MessageCreateParams {
    /// Creates a message request within an established conversation.
    pub fn new(conversation_id: ConversationId, user_input: impl Into<String>) -> Self {
        Self {
            conversation_id,
            user_input: user_input.into(),
        }
    }
}
