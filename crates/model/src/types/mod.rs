//! Shared types for the chat model.
//!
//! Error definitions, validation limits and conversation events used
//! across the entity and service modules.

pub mod errors;
pub mod events;
pub mod limits;

pub use errors::{ModelError, ModelResult};
pub use events::ConversationEvent;
pub use limits::LimitsConfig;
