//! Domain entities for the chat model.
//!
//! One canonical definition per entity, with the wire names the UI expects.

pub mod attachment;
pub mod contact;
pub mod group;
pub mod message;
pub mod reaction;
pub mod suggestion;

pub use attachment::{Attachment, AttachmentKind, FileHandle, MessageAttachment};
pub use contact::{filter_contacts, sort_contacts, DirectMessage};
pub use group::{group_by_date, MessageGroup};
pub use message::{Comment, Message};
pub use reaction::{toggle_reaction, Reaction, ReactionChange};
pub use suggestion::{
    apply_suggestion, detect_trigger, suggest, user_suggestions, Suggestion, SuggestionKind, Trigger,
};
