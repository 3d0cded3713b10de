//! Operations over the chat entities.
//!
//! `conversation` applies user actions to an in-memory chat and records
//! events; `legacy_import` turns older payload shapes into canonical messages.

pub mod conversation;
pub mod legacy_import;

pub use conversation::Conversation;
pub use legacy_import::{import_groups, import_messages, import_transcript};
