//! Events recorded by a conversation as it changes.

use serde::{Deserialize, Serialize};

use crate::entities::{Message, ReactionChange};

/// Conversation change event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ConversationEvent {
    /// Top-level message was posted
    MessagePosted { message: Message },

    /// Reply was added under `parent_id`
    #[serde(rename_all = "camelCase")]
    CommentAdded { parent_id: String, comment: Message },

    /// Message content was replaced
    #[serde(rename_all = "camelCase")]
    MessageEdited { message_id: String, content: String },

    /// Reaction was added or withdrawn
    #[serde(rename_all = "camelCase")]
    ReactionToggled {
        message_id: String,
        emoji: String,
        user: String,
        change: ReactionChange,
    },

    /// Message or reply was removed
    #[serde(rename_all = "camelCase")]
    MessageRemoved { message_id: String },
}

impl ConversationEvent {
    /// Id of the message the event concerns
    pub fn message_id(&self) -> &str {
        match self {
            ConversationEvent::MessagePosted { message } => &message.id,
            ConversationEvent::CommentAdded { comment, .. } => &comment.id,
            ConversationEvent::MessageEdited { message_id, .. }
            | ConversationEvent::ReactionToggled { message_id, .. }
            | ConversationEvent::MessageRemoved { message_id } => message_id,
        }
    }

    /// Get event type name for logging
    pub fn event_type_name(&self) -> &'static str {
        match self {
            ConversationEvent::MessagePosted { .. } => "message_posted",
            ConversationEvent::CommentAdded { .. } => "comment_added",
            ConversationEvent::MessageEdited { .. } => "message_edited",
            ConversationEvent::ReactionToggled { .. } => "reaction_toggled",
            ConversationEvent::MessageRemoved { .. } => "message_removed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = ConversationEvent::ReactionToggled {
            message_id: "m1".to_string(),
            emoji: "👍".to_string(),
            user: "alice".to_string(),
            change: ReactionChange::Added,
        };
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["type"], "reactionToggled");
        assert_eq!(value["data"]["messageId"], "m1");
        assert_eq!(value["data"]["change"], "added");
        assert_eq!(event.message_id(), "m1");
        assert_eq!(event.event_type_name(), "reaction_toggled");
    }

    #[test]
    fn test_event_round_trip() {
        let event = ConversationEvent::MessageRemoved {
            message_id: "m2".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"messageRemoved","data":{"messageId":"m2"}}"#);
        assert_eq!(serde_json::from_str::<ConversationEvent>(&json).unwrap(), event);
    }
}
