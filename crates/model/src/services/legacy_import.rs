//! Import of chat payloads written against the older UI definitions.
//!
//! The two historical shapes disagree on timestamps (display text vs. full
//! date), on whether an attachment must carry a file handle, and on field
//! names. Everything here lands in the canonical [`Message`].

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::entities::{Attachment, AttachmentKind, FileHandle, Message, Reaction};
use crate::types::{ModelError, ModelResult};
use crate::utils::timestamp::{from_millis, parse_time_on, parse_timestamp};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyMessage {
    #[serde(default)]
    id: Option<String>,
    #[serde(alias = "userId")]
    user: String,
    #[serde(default)]
    avatar: Option<String>,
    #[serde(default)]
    content: String,
    timestamp: LegacyTimestamp,
    #[serde(default)]
    attachments: Vec<LegacyAttachment>,
    #[serde(default, alias = "replies")]
    comments: Vec<LegacyMessage>,
    #[serde(default)]
    reactions: Vec<Reaction>,
    #[serde(default)]
    online: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LegacyTimestamp {
    Millis(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct LegacyAttachment {
    name: String,
    /// Browser `File` objects serialize as `{}`; only a complete handle is kept
    #[serde(default)]
    file: Option<Value>,
    #[serde(default)]
    preview: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<AttachmentKind>,
}

#[derive(Debug, Deserialize)]
struct LegacyGroup {
    date: String,
    #[serde(default)]
    messages: Vec<LegacyMessage>,
}

impl LegacyMessage {
    fn into_message(self, date: NaiveDate) -> ModelResult<Message> {
        let timestamp = match self.timestamp {
            LegacyTimestamp::Millis(millis) => from_millis(millis)?,
            LegacyTimestamp::Text(text) => match parse_timestamp(&text) {
                Ok(ts) => ts,
                Err(_) => {
                    let ts = parse_time_on(&text, date)?;
                    debug!(value = %text, %date, "placed time-only timestamp on reference date");
                    ts
                }
            },
        };

        let id = match self.id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4().to_string();
                debug!(%id, "assigned id to message without one");
                id
            }
        };

        let comments = self
            .comments
            .into_iter()
            .map(|c| c.into_message(date))
            .collect::<ModelResult<Vec<_>>>()?;

        let mut message = Message {
            id,
            user: self.user,
            avatar: self.avatar.filter(|a| !a.is_empty()),
            content: self.content,
            timestamp,
            attachments: self.attachments.into_iter().map(Attachment::from).collect(),
            comments,
            reactions: self.reactions,
            online: self.online,
        };
        message.normalize();
        Ok(message)
    }
}

impl From<LegacyAttachment> for Attachment {
    fn from(legacy: LegacyAttachment) -> Self {
        let file = legacy
            .file
            .and_then(|value| serde_json::from_value::<FileHandle>(value).ok());
        if file.is_none() {
            debug!(name = %legacy.name, "attachment has no usable file handle");
        }

        let kind = legacy.kind.unwrap_or_else(|| match file {
            Some(ref handle) if !handle.mime_type.is_empty() => {
                AttachmentKind::from_mime(&handle.mime_type)
            }
            _ => AttachmentKind::from_file_name(&legacy.name),
        });

        Attachment {
            name: legacy.name,
            file,
            preview: legacy.preview,
            kind,
        }
    }
}

/// Parse an array of messages in either legacy shape.
///
/// Time-only timestamps are placed on `reference_date` (UTC).
pub fn import_messages(json: &str, reference_date: NaiveDate) -> ModelResult<Vec<Message>> {
    let legacy: Vec<LegacyMessage> = serde_json::from_str(json)?;
    let messages = legacy
        .into_iter()
        .map(|m| m.into_message(reference_date))
        .collect::<ModelResult<Vec<_>>>()?;

    info!(count = messages.len(), "imported messages");
    Ok(messages)
}

/// Parse an array of date groups and flatten them into messages.
///
/// A group's own date anchors its time-only timestamps; `reference_date`
/// is used only when the group date cannot be read.
pub fn import_groups(json: &str, reference_date: NaiveDate) -> ModelResult<Vec<Message>> {
    let groups: Vec<LegacyGroup> = serde_json::from_str(json)?;
    let mut messages = Vec::new();

    for group in groups {
        let date = match parse_timestamp(&group.date) {
            Ok(ts) => ts.date_naive(),
            Err(_) => {
                warn!(date = %group.date, "unreadable group date, using reference date");
                reference_date
            }
        };
        for legacy in group.messages {
            messages.push(legacy.into_message(date)?);
        }
    }

    info!(count = messages.len(), "imported grouped messages");
    Ok(messages)
}

/// Import either a message array or a group array, detected from the first element.
pub fn import_transcript(json: &str, reference_date: NaiveDate) -> ModelResult<Vec<Message>> {
    let value: Value = serde_json::from_str(json)?;
    let items = value
        .as_array()
        .ok_or_else(|| ModelError::validation("Transcript must be a JSON array"))?;

    let is_grouped = items
        .first()
        .and_then(Value::as_object)
        .map(|first| first.contains_key("messages") && first.contains_key("date"))
        .unwrap_or(false);

    if is_grouped {
        import_groups(json, reference_date)
    } else {
        import_messages(json, reference_date)
    }
}
