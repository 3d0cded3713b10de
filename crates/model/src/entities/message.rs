use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::attachment::Attachment;
use super::reaction::{self, Reaction, ReactionChange};
use crate::types::{LimitsConfig, ModelError, ModelResult};
use crate::utils::timestamp::serde_flexible;
use crate::utils::Validator;

/// A single chat entry. Replies nest recursively in `comments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    /// Author identifier
    #[serde(alias = "userId")]
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(with = "serde_flexible")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, alias = "replies", skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Message>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<Reaction>,
    /// Author presence at the time the message was rendered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online: Option<bool>,
}

/// Flat view of a reply, without attachments, reactions or nested replies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub user: String,
    #[serde(default)]
    pub avatar: String,
    pub content: String,
    #[serde(with = "serde_flexible")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new message stamped with the current time
    pub fn new(user: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user: user.into(),
            avatar: None,
            content: content.into(),
            timestamp: Utc::now(),
            attachments: Vec::new(),
            comments: Vec::new(),
            reactions: Vec::new(),
            online: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn with_online(mut self, online: bool) -> Self {
        self.online = Some(online);
        self
    }

    /// Replace the message content
    pub fn edit(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Toggle `user`'s reaction with `emoji`
    pub fn toggle_reaction(&mut self, emoji: &str, user: &str) -> ReactionChange {
        reaction::toggle_reaction(&mut self.reactions, emoji, user)
    }

    pub fn reaction(&self, emoji: &str) -> Option<&Reaction> {
        self.reactions.iter().find(|r| r.emoji == emoji)
    }

    /// Sum of all reaction counts on this message (replies excluded)
    pub fn total_reactions(&self) -> usize {
        self.reactions.iter().map(|r| r.count).sum()
    }

    /// Append a direct reply
    pub fn add_comment(&mut self, comment: Message) {
        self.comments.push(comment);
    }

    /// Number of replies at every depth below this message
    pub fn thread_len(&self) -> usize {
        self.comments.iter().map(|c| 1 + c.thread_len()).sum()
    }

    /// Depth of the deepest reply; 0 when there are none
    pub fn thread_depth(&self) -> usize {
        self.comments
            .iter()
            .map(|c| 1 + c.thread_depth())
            .max()
            .unwrap_or(0)
    }

    /// Depth of `id` relative to this message, which is depth 0
    pub fn depth_of(&self, id: &str) -> Option<usize> {
        if self.id == id {
            return Some(0);
        }
        self.comments
            .iter()
            .find_map(|c| c.depth_of(id).map(|depth| depth + 1))
    }

    /// Find this message or a reply by id
    pub fn find(&self, id: &str) -> Option<&Message> {
        if self.id == id {
            return Some(self);
        }
        self.comments.iter().find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Message> {
        if self.id == id {
            return Some(self);
        }
        self.comments.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Remove a reply at any depth
    pub fn remove_comment(&mut self, id: &str) -> Option<Message> {
        if let Some(index) = self.comments.iter().position(|c| c.id == id) {
            return Some(self.comments.remove(index));
        }
        self.comments.iter_mut().find_map(|c| c.remove_comment(id))
    }

    /// Normalize reactions on this message and every reply.
    /// Returns the number of reactions that changed.
    pub fn normalize(&mut self) -> usize {
        let own = self
            .reactions
            .iter_mut()
            .map(|r| r.normalize() || r.is_empty())
            .filter(|changed| *changed)
            .count();
        self.reactions.retain(|r| !r.is_empty());
        own + self.comments.iter_mut().map(|c| c.normalize()).sum::<usize>()
    }

    /// Validate message data, including every reply
    pub fn validate(&self, limits: &LimitsConfig) -> ModelResult<()> {
        self.validate_at(limits, 0)
    }

    pub(crate) fn validate_at(&self, limits: &LimitsConfig, depth: usize) -> ModelResult<()> {
        if depth > limits.max_thread_depth {
            return Err(ModelError::thread_too_deep(depth, limits.max_thread_depth));
        }

        Validator::id("Message id", &self.id)?;
        Validator::id("Message author", &self.user)?;
        Validator::message_content(&self.content, limits.max_content_length)?;

        if self.content.trim().is_empty() && self.attachments.is_empty() {
            return Err(ModelError::validation(
                "Message content cannot be empty without attachments",
            ));
        }

        if self.attachments.len() > limits.max_attachments {
            return Err(ModelError::validation(format!(
                "Too many attachments ({}, max {})",
                self.attachments.len(),
                limits.max_attachments
            )));
        }

        for attachment in &self.attachments {
            attachment.validate(limits.max_attachment_bytes)?;
        }

        for reaction in &self.reactions {
            reaction.validate()?;
        }

        for comment in &self.comments {
            comment.validate_at(limits, depth + 1)?;
        }

        Ok(())
    }
}

impl From<&Message> for Comment {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.clone(),
            user: message.user.clone(),
            avatar: message.avatar.clone().unwrap_or_default(),
            content: message.content.clone(),
            timestamp: message.timestamp,
        }
    }
}

impl From<Comment> for Message {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            user: comment.user,
            avatar: Some(comment.avatar).filter(|a| !a.is_empty()),
            content: comment.content,
            timestamp: comment.timestamp,
            attachments: Vec::new(),
            comments: Vec::new(),
            reactions: Vec::new(),
            online: None,
        }
    }
}
