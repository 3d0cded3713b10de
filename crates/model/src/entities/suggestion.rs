use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::contact::DirectMessage;

/// `@name` or `#channel` token ending at the cursor
static TRIGGER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)([@#])(\S*)$").expect("trigger pattern is valid"));

/// Composer autocomplete entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    User,
    Channel,
}

impl SuggestionKind {
    pub fn trigger(self) -> char {
        match self {
            SuggestionKind::User => '@',
            SuggestionKind::Channel => '#',
        }
    }

    pub fn from_trigger(c: char) -> Option<Self> {
        match c {
            '@' => Some(SuggestionKind::User),
            '#' => Some(SuggestionKind::Channel),
            _ => None,
        }
    }
}

/// An in-progress mention found in the composer text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub kind: SuggestionKind,
    /// Text typed after the trigger character
    pub query: String,
    /// Byte offset of the trigger character
    pub start: usize,
}

impl Suggestion {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            kind: SuggestionKind::User,
            text: text.into(),
        }
    }

    pub fn channel(text: impl Into<String>) -> Self {
        Self {
            kind: SuggestionKind::Channel,
            text: text.into(),
        }
    }

    /// Text written into the composer when the suggestion is picked
    pub fn insert_text(&self) -> String {
        format!("{}{} ", self.kind.trigger(), self.text)
    }
}

fn clamp_cursor(input: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(input.len());
    while !input.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

/// Find the mention token that ends at `cursor` (a byte offset)
pub fn detect_trigger(input: &str, cursor: usize) -> Option<Trigger> {
    let cursor = clamp_cursor(input, cursor);
    let captures = TRIGGER_TOKEN.captures(&input[..cursor])?;
    let marker = captures.get(1)?;
    let kind = marker.as_str().chars().next().and_then(SuggestionKind::from_trigger)?;
    let query = captures.get(2).map(|m| m.as_str()).unwrap_or_default();

    Some(Trigger {
        kind,
        query: query.to_string(),
        start: marker.start(),
    })
}

/// Rank candidates for `trigger`: prefix matches first, then substring
/// matches, each band in input order.
pub fn suggest(candidates: &[Suggestion], trigger: &Trigger, limit: usize) -> Vec<Suggestion> {
    let query = trigger.query.to_lowercase();
    let mut prefix = Vec::new();
    let mut contains = Vec::new();

    for candidate in candidates.iter().filter(|c| c.kind == trigger.kind) {
        if prefix.contains(candidate) || contains.contains(candidate) {
            continue;
        }
        let text = candidate.text.to_lowercase();
        if text.starts_with(&query) {
            prefix.push(candidate.clone());
        } else if text.contains(&query) {
            contains.push(candidate.clone());
        }
    }

    prefix.into_iter().chain(contains).take(limit).collect()
}

/// Replace the trigger token with the suggestion; returns the new text and cursor
pub fn apply_suggestion(
    input: &str,
    trigger: &Trigger,
    cursor: usize,
    suggestion: &Suggestion,
) -> (String, usize) {
    let start = clamp_cursor(input, trigger.start);
    let cursor = clamp_cursor(input, cursor).max(start);
    let insert = suggestion.insert_text();

    let mut output = String::with_capacity(input.len() + insert.len());
    output.push_str(&input[..start]);
    output.push_str(&insert);
    output.push_str(&input[cursor..]);

    (output, start + insert.len())
}

/// One user suggestion per contact
pub fn user_suggestions(contacts: &[DirectMessage]) -> Vec<Suggestion> {
    contacts.iter().map(|c| Suggestion::user(c.name.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<Suggestion> {
        vec![
            Suggestion::user("Bob"),
            Suggestion::user("alice"),
            Suggestion::user("Malika"),
            Suggestion::channel("general"),
            Suggestion::user("Alfred"),
            Suggestion::user("alice"),
        ]
    }

    #[test]
    fn test_detect_user_trigger() {
        let input = "hey @ali";
        let trigger = detect_trigger(input, input.len()).unwrap();
        assert_eq!(trigger.kind, SuggestionKind::User);
        assert_eq!(trigger.query, "ali");
        assert_eq!(trigger.start, 4);
    }

    #[test]
    fn test_detect_channel_trigger_at_start() {
        let trigger = detect_trigger("#gen", 4).unwrap();
        assert_eq!(trigger.kind, SuggestionKind::Channel);
        assert_eq!(trigger.query, "gen");
        assert_eq!(trigger.start, 0);
    }

    #[test]
    fn test_detect_bare_trigger() {
        let trigger = detect_trigger("ping @", 6).unwrap();
        assert_eq!(trigger.query, "");
    }

    #[test]
    fn test_no_trigger() {
        assert!(detect_trigger("mail me at bob@example.com", 26).is_none());
        assert!(detect_trigger("@alice done", 11).is_none());
        assert!(detect_trigger("", 0).is_none());
    }

    #[test]
    fn test_cursor_mid_text_and_clamping() {
        let input = "@al and more";
        let trigger = detect_trigger(input, 3).unwrap();
        assert_eq!(trigger.query, "al");

        assert!(detect_trigger("hi @bo", 100).is_some());
        // Cursor inside a multi-byte char moves back to a boundary.
        let input = "@é";
        let trigger = detect_trigger(input, 2).unwrap();
        assert_eq!(trigger.query, "");
    }

    #[test]
    fn test_suggest_ranking() {
        let trigger = Trigger {
            kind: SuggestionKind::User,
            query: "al".to_string(),
            start: 0,
        };
        let results: Vec<_> = suggest(&candidates(), &trigger, 10)
            .into_iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(results, vec!["alice", "Alfred", "Malika"]);

        assert_eq!(suggest(&candidates(), &trigger, 1).len(), 1);
    }

    #[test]
    fn test_suggest_by_kind() {
        let trigger = Trigger {
            kind: SuggestionKind::Channel,
            query: String::new(),
            start: 0,
        };
        assert_eq!(
            suggest(&candidates(), &trigger, 10),
            vec![Suggestion::channel("general")]
        );
    }

    #[test]
    fn test_apply_suggestion() {
        let input = "hey @ali how are you";
        let trigger = detect_trigger(input, 8).unwrap();
        let (text, cursor) = apply_suggestion(input, &trigger, 8, &Suggestion::user("alice"));
        assert_eq!(text, "hey @alice  how are you");
        assert_eq!(cursor, 11);
    }

    #[test]
    fn test_apply_suggestion_with_stale_trigger() {
        let trigger = Trigger {
            kind: SuggestionKind::User,
            query: "al".to_string(),
            start: 10,
        };
        let (text, cursor) = apply_suggestion("hi @al", &trigger, 6, &Suggestion::user("alice"));
        assert_eq!(text, "hi @al@alice ");
        assert_eq!(cursor, 13);
    }

    #[test]
    fn test_user_suggestions() {
        let contacts = vec![DirectMessage::new("Alice", ""), DirectMessage::new("Bob", "")];
        assert_eq!(
            user_suggestions(&contacts),
            vec![Suggestion::user("Alice"), Suggestion::user("Bob")]
        );
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_string(&Suggestion::channel("general")).unwrap();
        assert_eq!(json, r#"{"type":"channel","text":"general"}"#);
    }
}
