use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ModelResult;
use crate::utils::Validator;

/// A one-to-one conversation target shown in the sidebar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectMessage {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub online: bool,
}

impl DirectMessage {
    /// Create a new offline contact
    pub fn new(name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            avatar: avatar.into(),
            online: false,
        }
    }

    pub fn set_online(&mut self, online: bool) {
        self.online = online;
    }

    /// Case-insensitive substring match on the name; the empty query matches all
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        query.is_empty() || self.name.to_lowercase().contains(&query.to_lowercase())
    }

    pub fn validate(&self) -> ModelResult<()> {
        Validator::id("Contact id", &self.id)?;
        Validator::display_name(&self.name)
    }
}

/// Sort contacts online first, then by name (case-insensitive), then by id
pub fn sort_contacts(contacts: &mut [DirectMessage]) {
    contacts.sort_by(|a, b| {
        b.online
            .cmp(&a.online)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Contacts matching `query`, in their existing order
pub fn filter_contacts<'a>(contacts: &'a [DirectMessage], query: &str) -> Vec<&'a DirectMessage> {
    contacts.iter().filter(|c| c.matches(query)).collect()
}
