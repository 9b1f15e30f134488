use serde::{Deserialize, Serialize};

/// Request body for `POST /conversation`.
///
/// The first user message rides along with the creation request; the backend
/// does not answer it here, the client repeats it on `/message`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationCreateParams {
    /// The message that triggered the conversation.
    pub user_input: String,
}

impl ConversationCreateParams {
    /// Creates the request body for the given first message.
    pub fn new(user_input: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
        }
    }
}
