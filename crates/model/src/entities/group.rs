use chrono::{Datelike, Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use super::message::Message;
use crate::utils::timestamp::local_date;

/// Messages bucketed by calendar date for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageGroup {
    /// Local date, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    pub messages: Vec<Message>,
}

impl MessageGroup {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            messages: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Heading shown above the group, relative to `today`.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use chatline_model::MessageGroup;
    ///
    /// let today = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
    /// let group = MessageGroup::new(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    /// assert_eq!(group.label(today), "Monday, March 4");
    /// ```
    pub fn label(&self, today: NaiveDate) -> String {
        if self.date == today {
            return "Today".to_string();
        }
        if today.checked_sub_signed(Duration::days(1)) == Some(self.date) {
            return "Yesterday".to_string();
        }
        if self.date.year() == today.year() {
            self.date.format("%A, %B %-d").to_string()
        } else {
            self.date.format("%B %-d, %Y").to_string()
        }
    }
}

/// Bucket messages by their date in `offset`.
///
/// Messages are stably sorted by timestamp first, so groups come out in
/// ascending date order and messages with equal timestamps keep their
/// input order.
pub fn group_by_date(messages: Vec<Message>, offset: FixedOffset) -> Vec<MessageGroup> {
    let mut messages = messages;
    messages.sort_by_key(|m| m.timestamp);

    let mut groups: Vec<MessageGroup> = Vec::new();
    for message in messages {
        let date = local_date(&message.timestamp, offset);
        match groups.last_mut() {
            Some(group) if group.date == date => group.messages.push(message),
            _ => {
                let mut group = MessageGroup::new(date);
                group.messages.push(message);
                groups.push(group);
            }
        }
    }

    groups
}
