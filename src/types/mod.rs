// Public modules
pub mod conversation;
pub mod conversation_create_params;
pub mod conversation_id;
pub mod message_create_params;
pub mod message_reply;

// Re-exports
pub use conversation::Conversation;
pub use conversation_create_params::ConversationCreateParams;
pub use conversation_id::ConversationId;
pub use message_create_params::MessageCreateParams;
pub use message_reply::MessageReply;
