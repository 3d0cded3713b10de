//! # Chatline Model Crate
//!
//! Canonical entities for a chat-style UI and the operations performed on
//! them: messages with nested replies, reactions, attachments, direct-message
//! contacts, composer suggestions and date grouping.
//!
//! ## Architecture
//!
//! - **Entities**: Domain models (Message, Reaction, Attachment, etc.)
//! - **Services**: Conversation operations and legacy payload import
//! - **Types**: Errors, limits and conversation events
//! - **Utils**: Timestamp parsing and validation
//!
//! ## Usage
//!
//! ```rust
//! use chatline_model::{Conversation, LimitsConfig, Message, ReactionChange};
//!
//! let mut conversation = Conversation::new(LimitsConfig::default());
//! let id = conversation.post(Message::new("alice", "hello"))?.id.clone();
//! assert_eq!(conversation.react(&id, "👋", "bob")?, ReactionChange::Added);
//! # Ok::<(), chatline_model::ModelError>(())
//! ```

pub mod entities;
pub mod services;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use entities::{
    Attachment, AttachmentKind, Comment, DirectMessage, FileHandle, Message, MessageAttachment,
    MessageGroup, Reaction, ReactionChange, Suggestion, SuggestionKind, Trigger,
};
pub use services::{import_groups, import_messages, import_transcript, Conversation};
pub use types::{ConversationEvent, LimitsConfig, ModelError, ModelResult};
