//! In-memory conversation: applies chat operations and records events.

use std::collections::HashSet;

use chrono::FixedOffset;
use tracing::debug;

use crate::entities::{group_by_date, Message, MessageGroup, ReactionChange};
use crate::types::{ConversationEvent, LimitsConfig, ModelError, ModelResult};
use crate::utils::Validator;

/// Top-level messages of one chat, in posting order
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    limits: LimitsConfig,
    messages: Vec<Message>,
    events: Vec<ConversationEvent>,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new(limits: LimitsConfig) -> Self {
        Self {
            limits,
            messages: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Load existing history without recording events.
    /// Reaction tallies are recounted before validation.
    pub fn from_messages(limits: LimitsConfig, mut messages: Vec<Message>) -> ModelResult<Self> {
        for message in &mut messages {
            message.normalize();
        }

        {
            let mut seen = HashSet::new();
            for message in &messages {
                message.validate(&limits)?;
                collect_ids(message, &mut seen)?;
            }
        }

        debug!(count = messages.len(), "loaded conversation history");
        Ok(Self {
            limits,
            messages,
            events: Vec::new(),
        })
    }

    pub fn limits(&self) -> &LimitsConfig {
        &self.limits
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Find a message or reply by id
    pub fn find(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find_map(|m| m.find(id))
    }

    /// Post a new top-level message
    pub fn post(&mut self, mut message: Message) -> ModelResult<&Message> {
        message.normalize();
        message.validate(&self.limits)?;
        self.ensure_unique(&message)?;

        self.record(ConversationEvent::MessagePosted {
            message: message.clone(),
        });
        self.messages.push(message);

        Ok(&self.messages[self.messages.len() - 1])
    }

    /// Add a reply under `parent_id`, which may itself be a reply
    pub fn reply(&mut self, parent_id: &str, mut message: Message) -> ModelResult<&Message> {
        let parent_depth = self
            .messages
            .iter()
            .find_map(|m| m.depth_of(parent_id))
            .ok_or_else(|| ModelError::message_not_found(parent_id))?;

        message.normalize();
        message.validate_at(&self.limits, parent_depth + 1)?;
        self.ensure_unique(&message)?;

        self.record(ConversationEvent::CommentAdded {
            parent_id: parent_id.to_string(),
            comment: message.clone(),
        });

        let parent = self
            .messages
            .iter_mut()
            .find_map(|m| m.find_mut(parent_id))
            .ok_or_else(|| ModelError::message_not_found(parent_id))?;
        parent.add_comment(message);

        Ok(&parent.comments[parent.comments.len() - 1])
    }

    /// Replace a message's content
    pub fn edit(&mut self, id: &str, content: impl Into<String>) -> ModelResult<()> {
        let content = content.into();
        Validator::message_content(&content, self.limits.max_content_length)?;

        let target = self
            .messages
            .iter_mut()
            .find_map(|m| m.find_mut(id))
            .ok_or_else(|| ModelError::message_not_found(id))?;

        if content.trim().is_empty() && target.attachments.is_empty() {
            return Err(ModelError::validation(
                "Message content cannot be empty without attachments",
            ));
        }

        target.edit(content.clone());
        self.record(ConversationEvent::MessageEdited {
            message_id: id.to_string(),
            content,
        });
        Ok(())
    }

    /// Toggle `user`'s `emoji` reaction on a message or reply
    pub fn react(&mut self, id: &str, emoji: &str, user: &str) -> ModelResult<ReactionChange> {
        Validator::emoji(emoji)?;
        Validator::id("Reaction user", user)?;

        let target = self
            .messages
            .iter_mut()
            .find_map(|m| m.find_mut(id))
            .ok_or_else(|| ModelError::message_not_found(id))?;
        let change = target.toggle_reaction(emoji, user);

        self.record(ConversationEvent::ReactionToggled {
            message_id: id.to_string(),
            emoji: emoji.to_string(),
            user: user.to_string(),
            change,
        });
        Ok(change)
    }

    /// Remove a message or reply, together with its own replies
    pub fn remove(&mut self, id: &str) -> ModelResult<Message> {
        let removed = match self.messages.iter().position(|m| m.id == id) {
            Some(index) => Some(self.messages.remove(index)),
            None => self.messages.iter_mut().find_map(|m| m.remove_comment(id)),
        }
        .ok_or_else(|| ModelError::message_not_found(id))?;

        self.record(ConversationEvent::MessageRemoved {
            message_id: id.to_string(),
        });
        Ok(removed)
    }

    /// Top-level messages bucketed by date in `offset`
    pub fn groups(&self, offset: FixedOffset) -> Vec<MessageGroup> {
        group_by_date(self.messages.clone(), offset)
    }

    pub fn events(&self) -> &[ConversationEvent] {
        &self.events
    }

    /// Take all recorded events, oldest first
    pub fn drain_events(&mut self) -> Vec<ConversationEvent> {
        std::mem::take(&mut self.events)
    }

    fn ensure_unique(&self, message: &Message) -> ModelResult<()> {
        let mut seen = HashSet::new();
        for existing in &self.messages {
            collect_ids(existing, &mut seen)?;
        }
        collect_ids(message, &mut seen)
    }

    fn record(&mut self, event: ConversationEvent) {
        debug!(
            event = event.event_type_name(),
            message_id = event.message_id(),
            "conversation event"
        );
        self.events.push(event);
    }
}

fn collect_ids<'a>(message: &'a Message, seen: &mut HashSet<&'a str>) -> ModelResult<()> {
    if !seen.insert(message.id.as_str()) {
        return Err(ModelError::duplicate_message(message.id.clone()));
    }
    for comment in &message.comments {
        collect_ids(comment, seen)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Reaction;

    fn msg(id: &str, user: &str) -> Message {
        Message::new(user, format!("message {}", id)).with_id(id)
    }

    fn conversation() -> Conversation {
        Conversation::new(LimitsConfig::default())
    }

    #[test]
    fn test_post_and_find() {
        let mut conv = conversation();
        let posted = conv.post(msg("m1", "alice")).unwrap();
        assert_eq!(posted.id, "m1");

        assert_eq!(conv.len(), 1);
        assert!(conv.find("m1").is_some());
        assert!(conv.find("nope").is_none());
        assert_eq!(conv.events().len(), 1);
    }

    #[test]
    fn test_post_rejects_duplicates_and_invalid() {
        let mut conv = conversation();
        conv.post(msg("m1", "alice")).unwrap();

        assert!(matches!(
            conv.post(msg("m1", "bob")),
            Err(ModelError::DuplicateMessage { .. })
        ));
        assert!(conv.post(Message::new("alice", "  ")).is_err());
        assert_eq!(conv.len(), 1);
        assert_eq!(conv.events().len(), 1);
    }

    #[test]
    fn test_reply_nesting_and_depth_limit() {
        let mut conv = conversation();
        conv.post(msg("m1", "alice")).unwrap();
        conv.reply("m1", msg("c1", "bob")).unwrap();
        conv.reply("c1", msg("c2", "carol")).unwrap();

        assert_eq!(conv.find("m1").unwrap().thread_len(), 2);
        assert!(matches!(
            conv.reply("c2", msg("c3", "dave")),
            Err(ModelError::ThreadTooDeep { depth: 3, max: 2 })
        ));
        assert!(matches!(
            conv.reply("missing", msg("c4", "dave")),
            Err(ModelError::MessageNotFound { .. })
        ));
        assert!(matches!(
            conv.reply("m1", msg("c1", "dave")),
            Err(ModelError::DuplicateMessage { .. })
        ));
    }

    #[test]
    fn test_edit() {
        let mut conv = conversation();
        conv.post(msg("m1", "alice")).unwrap();
        conv.reply("m1", msg("c1", "bob")).unwrap();

        conv.edit("c1", "updated").unwrap();
        assert_eq!(conv.find("c1").unwrap().content, "updated");

        assert!(conv.edit("c1", "").is_err());
        assert!(conv.edit("zzz", "x").is_err());
    }

    #[test]
    fn test_react_toggles() {
        let mut conv = conversation();
        conv.post(msg("m1", "alice")).unwrap();

        assert_eq!(conv.react("m1", "👍", "bob").unwrap(), ReactionChange::Added);
        assert_eq!(conv.react("m1", "👍", "bob").unwrap(), ReactionChange::Removed);
        assert!(conv.find("m1").unwrap().reactions.is_empty());

        assert!(conv.react("m1", "", "bob").is_err());
        assert!(conv.react("m1", "👍", "").is_err());
        assert!(conv.react("nope", "👍", "bob").is_err());
    }

    #[test]
    fn test_remove() {
        let mut conv = conversation();
        conv.post(msg("m1", "alice")).unwrap();
        conv.reply("m1", msg("c1", "bob")).unwrap();

        assert_eq!(conv.remove("c1").unwrap().id, "c1");
        assert_eq!(conv.find("m1").unwrap().thread_len(), 0);
        assert_eq!(conv.remove("m1").unwrap().id, "m1");
        assert!(conv.is_empty());
        assert!(conv.remove("m1").is_err());
    }

    #[test]
    fn test_drain_events_in_order() {
        let mut conv = conversation();
        conv.post(msg("m1", "alice")).unwrap();
        conv.react("m1", "🎉", "bob").unwrap();
        conv.reply("m1", msg("c1", "bob")).unwrap();

        let names: Vec<_> = conv
            .drain_events()
            .iter()
            .map(|e| e.event_type_name())
            .collect();
        assert_eq!(names, vec!["message_posted", "reaction_toggled", "comment_added"]);
        assert!(conv.events().is_empty());
    }

    fn with_bad_reactions(mut message: Message) -> Message {
        message.reactions.push(Reaction {
            emoji: "👍".to_string(),
            count: 5,
            users: vec!["bob".to_string(), "bob".to_string()],
        });
        message.reactions.push(Reaction {
            emoji: "👀".to_string(),
            count: 0,
            users: Vec::new(),
        });
        message
    }

    #[test]
    fn test_incoming_reactions_are_recounted() {
        let mut conv = conversation();
        let posted = conv.post(with_bad_reactions(msg("m1", "alice"))).unwrap();
        assert_eq!(posted.reactions, vec![Reaction::new("👍", "bob")]);

        let replied = conv
            .reply("m1", with_bad_reactions(msg("c1", "carol")))
            .unwrap();
        assert_eq!(replied.reactions, vec![Reaction::new("👍", "bob")]);

        let loaded = Conversation::from_messages(
            LimitsConfig::default(),
            vec![with_bad_reactions(msg("m2", "dave"))],
        )
        .unwrap();
        assert_eq!(loaded.messages()[0].reactions, vec![Reaction::new("👍", "bob")]);

        assert_eq!(conv.react("m1", "👍", "bob").unwrap(), ReactionChange::Removed);
        assert!(conv.find("m1").unwrap().reactions.is_empty());
    }

    #[test]
    fn test_from_messages_rejects_nested_duplicates() {
        let mut root = msg("m1", "alice");
        root.add_comment(msg("m2", "bob"));
        let result = Conversation::from_messages(
            LimitsConfig::default(),
            vec![root, msg("m2", "carol")],
        );
        assert!(matches!(result, Err(ModelError::DuplicateMessage { .. })));
    }
}
