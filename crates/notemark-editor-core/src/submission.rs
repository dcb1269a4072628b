//! Packaging a note for the persistence collaborator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::types::{ResolvedMention, RosterEntry, Token};

/// What gets handed to [`NotesApi`] on submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    /// Hashtag names without `#`, document order, duplicates kept.
    pub tags: Vec<SmolStr>,
    /// Roster ids of resolved mentions, document order.
    pub mention_ids: Vec<i64>,
}

impl SubmissionPayload {
    /// True when the content is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Build the payload from already tokenized and resolved text.
///
/// Never fails. A bare `#` has an empty name and contributes no tag.
pub fn assemble(
    text: &str,
    tokens: &[Token],
    resolutions: &[ResolvedMention],
    title: Option<&str>,
) -> SubmissionPayload {
    let tags = tokens
        .iter()
        .filter(|t| t.is_hashtag())
        .map(Token::name)
        .filter(|name| !name.is_empty())
        .map(SmolStr::new)
        .collect();

    let mut mentions: Vec<&ResolvedMention> = resolutions.iter().collect();
    mentions.sort_by_key(|r| r.token.start);
    let mention_ids = mentions.into_iter().filter_map(|r| r.entry_id()).collect();

    SubmissionPayload {
        title: title.map(str::to_owned),
        content: text.to_owned(),
        tags,
        mention_ids,
    }
}

/// Field name to messages, as the persistence API reports validation.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("note rejected: {}", format_fields(.0))]
    Validation(FieldErrors),
    #[error("note could not be saved: {0}")]
    Failed(String),
}

impl SubmitError {
    /// Single-field validation error.
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(name.into(), vec![message.into()]);
        SubmitError::Validation(fields)
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SubmitError::Validation(fields) => Some(fields),
            SubmitError::Failed(_) => None,
        }
    }
}

fn format_fields(fields: &FieldErrors) -> String {
    fields
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

/// The note as stored by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedNote {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<SmolStr>,
    #[serde(default)]
    pub mentions: Vec<RosterEntry>,
}

/// Completion callback for a submission.
pub type SubmitCallback = Box<dyn FnOnce(Result<SavedNote, SubmitError>)>;

/// Notes persistence collaborator.
///
/// Calls return immediately. The outcome arrives through `done`, possibly
/// later. The engine does not retry.
pub trait NotesApi {
    fn create(&self, payload: SubmissionPayload, done: SubmitCallback);

    fn update(&self, note_id: i64, payload: SubmissionPayload, done: SubmitCallback);
}

impl<T: NotesApi + ?Sized> NotesApi for &T {
    fn create(&self, payload: SubmissionPayload, done: SubmitCallback) {
        (*self).create(payload, done)
    }

    fn update(&self, note_id: i64, payload: SubmissionPayload, done: SubmitCallback) {
        (*self).update(note_id, payload, done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::resolve_all;
    use crate::tokenizer::tokenize;

    fn assemble_text(text: &str, roster: &[RosterEntry]) -> SubmissionPayload {
        let tokens = tokenize(text);
        let resolutions = resolve_all(&tokens, roster);
        assemble(text, &tokens, &resolutions, None)
    }

    #[test]
    fn test_tags_in_order_with_duplicates() {
        let payload = assemble_text("#urgent #followup plain #urgent", &[]);
        assert_eq!(payload.tags, vec!["urgent", "followup", "urgent"]);
        assert!(payload.mention_ids.is_empty());
    }

    #[test]
    fn test_mention_ids_only_for_resolved() {
        let roster = vec![
            RosterEntry::new(5, "John", "Doe"),
            RosterEntry::new(9, "Ann", "Lee"),
        ];
        let payload = assemble_text("@Lee then @Nobody then @john", &roster);
        assert_eq!(payload.mention_ids, vec![9, 5]);
    }

    #[test]
    fn test_bare_sigil_is_not_a_tag() {
        let payload = assemble_text("trailing #", &[]);
        assert!(payload.tags.is_empty());
    }

    #[test]
    fn test_empty_and_blank() {
        let payload = assemble_text("", &[]);
        assert!(payload.tags.is_empty());
        assert!(payload.mention_ids.is_empty());
        assert!(payload.is_blank());
        assert!(assemble_text(" \t\n", &[]).is_blank());
    }

    #[test]
    fn test_title_and_wire_format() {
        let tokens = tokenize("#a");
        let payload = assemble("#a", &tokens, &[], Some("Standup"));
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Standup",
                "content": "#a",
                "tags": ["a"],
                "mentionIds": []
            })
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = SubmitError::field("content", "must not be blank");
        assert_eq!(err.to_string(), "note rejected: content: must not be blank");
        assert!(err.field_errors().is_some());
        assert!(SubmitError::Failed("offline".into()).field_errors().is_none());
    }
}
