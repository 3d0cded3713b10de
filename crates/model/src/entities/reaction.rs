use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{ModelError, ModelResult};
use crate::utils::Validator;

/// An emoji-keyed tally of the users who reacted to a message.
///
/// `count` always equals `users.len()`; it is kept on the wire because UI
/// payloads expect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub emoji: String,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub users: Vec<String>,
}

/// Outcome of [`toggle_reaction`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionChange {
    Added,
    Removed,
}

impl Reaction {
    /// Create a reaction with a single user
    pub fn new(emoji: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            emoji: emoji.into(),
            count: 1,
            users: vec![user.into()],
        }
    }

    pub fn has_reacted(&self, user: &str) -> bool {
        self.users.iter().any(|u| u == user)
    }

    /// Add a user; returns false if they had already reacted
    pub fn add_user(&mut self, user: impl Into<String>) -> bool {
        let user = user.into();
        if self.has_reacted(&user) {
            return false;
        }
        self.users.push(user);
        self.count = self.users.len();
        true
    }

    /// Remove a user; returns false if they had not reacted
    pub fn remove_user(&mut self, user: &str) -> bool {
        let before = self.users.len();
        self.users.retain(|u| u != user);
        self.count = self.users.len();
        before != self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Drop duplicate users and recompute `count`. Returns whether anything changed.
    pub fn normalize(&mut self) -> bool {
        let original = self.users.len();
        let mut seen = Vec::with_capacity(original);
        for user in self.users.drain(..) {
            if !seen.contains(&user) {
                seen.push(user);
            }
        }
        let deduped = seen.len();
        self.users = seen;

        if self.count == deduped {
            return deduped != original;
        }

        warn!(
            emoji = %self.emoji,
            declared = self.count,
            actual = deduped,
            "reaction count disagrees with user list, recounting"
        );
        self.count = deduped;
        true
    }

    /// Check the emoji and that `count` matches a non-empty, duplicate-free user list
    pub fn validate(&self) -> ModelResult<()> {
        Validator::emoji(&self.emoji)?;

        if self.users.is_empty() {
            return Err(ModelError::validation(format!(
                "Reaction {} has no users",
                self.emoji
            )));
        }

        for (index, user) in self.users.iter().enumerate() {
            Validator::id("Reaction user", user)?;
            if self.users[..index].contains(user) {
                return Err(ModelError::validation(format!(
                    "Reaction {} lists user {} more than once",
                    self.emoji, user
                )));
            }
        }

        if self.count != self.users.len() {
            return Err(ModelError::validation(format!(
                "Reaction {} count {} does not match {} users",
                self.emoji,
                self.count,
                self.users.len()
            )));
        }

        Ok(())
    }
}

/// Toggle `user`'s `emoji` reaction within a message's reaction list.
///
/// New emoji are appended so existing reactions keep their display order.
/// A reaction whose last user is removed disappears from the list.
pub fn toggle_reaction(reactions: &mut Vec<Reaction>, emoji: &str, user: &str) -> ReactionChange {
    match reactions.iter().position(|r| r.emoji == emoji) {
        Some(index) => {
            let reaction = &mut reactions[index];
            if reaction.remove_user(user) {
                if reaction.is_empty() {
                    reactions.remove(index);
                }
                ReactionChange::Removed
            } else {
                reaction.add_user(user);
                ReactionChange::Added
            }
        }
        None => {
            reactions.push(Reaction::new(emoji, user));
            ReactionChange::Added
        }
    }
}
