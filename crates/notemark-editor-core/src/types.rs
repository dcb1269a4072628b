//! Core annotation types: tokens, roster entries, resolutions, segments, caret snapshots.
//!
//! These are plain values recomputed on every text change. Nothing here keeps
//! identity across render passes.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Which sigil a token started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// `#tag`
    Hashtag,
    /// `@name`
    Mention,
}

impl TokenKind {
    /// The character that opens a token of this kind.
    pub fn sigil(self) -> char {
        match self {
            TokenKind::Hashtag => '#',
            TokenKind::Mention => '@',
        }
    }

    /// Map a sigil character back to its token kind.
    pub fn from_sigil(c: char) -> Option<Self> {
        match c {
            '#' => Some(TokenKind::Hashtag),
            '@' => Some(TokenKind::Mention),
            _ => None,
        }
    }
}

/// A recognized hashtag or mention span.
///
/// `start` and `end` are character offsets (NOT byte offsets!) into the
/// source text. `start < end` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token, including the sigil.
    pub raw_text: SmolStr,
    pub start: usize,
    pub end: usize,
}

impl Token {
    /// Token text without the leading sigil.
    pub fn name(&self) -> &str {
        &self.raw_text[self.kind.sigil().len_utf8()..]
    }

    /// Char range covered by this token.
    pub fn char_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Length in chars.
    pub fn char_len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_hashtag(&self) -> bool {
        self.kind == TokenKind::Hashtag
    }

    pub fn is_mention(&self) -> bool {
        self.kind == TokenKind::Mention
    }
}

/// A known person that mentions can resolve to.
///
/// Supplied read-only by the roster provider. Field names follow the
/// provider's JSON (`firstName`, `lastName`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl RosterEntry {
    pub fn new(id: i64, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// "First Last", for display in suggestion lists.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A mention token paired with the roster entry it resolved to, if any.
///
/// `entry == None` is the invalid-mention state: it still renders, just
/// classified differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMention {
    pub token: Token,
    pub entry: Option<RosterEntry>,
}

impl ResolvedMention {
    pub fn is_valid(&self) -> bool {
        self.entry.is_some()
    }

    pub fn entry_id(&self) -> Option<i64> {
        self.entry.as_ref().map(|e| e.id)
    }
}

/// Semantic classification of a rendered segment.
///
/// The display layer decides what each one looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    PlainText,
    Hashtag,
    ValidMention,
    InvalidMention,
}

impl Classification {
    /// Class-name suffix used in rendered markup. Plain text has none.
    pub fn class_suffix(self) -> Option<&'static str> {
        match self {
            Classification::PlainText => None,
            Classification::Hashtag => Some("hashtag"),
            Classification::ValidMention => Some("mention"),
            Classification::InvalidMention => Some("mention-invalid"),
        }
    }
}

/// One output unit of the composer.
///
/// Concatenating the `text` of every segment reproduces the input exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: SmolStr,
    pub classification: Classification,
    /// Source char range this segment covers.
    pub char_range: Range<usize>,
    /// Roster id for valid mentions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster_id: Option<i64>,
}

impl Segment {
    pub fn char_len(&self) -> usize {
        self.char_range.len()
    }
}

/// Cursor position captured before a re-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaretSnapshot {
    /// Characters from the start of the flattened text.
    pub flat_offset: usize,
}

impl CaretSnapshot {
    pub fn new(flat_offset: usize) -> Self {
        Self { flat_offset }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_name_strips_sigil() {
        let token = Token {
            kind: TokenKind::Mention,
            raw_text: "@John.Doe".into(),
            start: 4,
            end: 13,
        };
        assert_eq!(token.name(), "John.Doe");
        assert_eq!(token.char_len(), 9);
        assert_eq!(token.char_range(), 4..13);
    }

    #[test]
    fn test_sigil_round_trip() {
        assert_eq!(TokenKind::from_sigil('#'), Some(TokenKind::Hashtag));
        assert_eq!(TokenKind::from_sigil('@'), Some(TokenKind::Mention));
        assert_eq!(TokenKind::from_sigil('!'), None);
        assert_eq!(TokenKind::Hashtag.sigil(), '#');
    }

    #[test]
    fn test_roster_entry_json_field_names() {
        let entry: RosterEntry =
            serde_json::from_str(r#"{"id":5,"firstName":"John","lastName":"Doe"}"#).unwrap();
        assert_eq!(entry, RosterEntry::new(5, "John", "Doe"));
        assert_eq!(entry.full_name(), "John Doe");

        let json = serde_json::to_string(&entry.with_email("jd@example.com")).unwrap();
        assert!(json.contains("\"firstName\":\"John\""));
        assert!(json.contains("\"email\":\"jd@example.com\""));
    }

    #[test]
    fn test_class_suffix() {
        assert_eq!(Classification::PlainText.class_suffix(), None);
        assert_eq!(Classification::Hashtag.class_suffix(), Some("hashtag"));
        assert_eq!(
            Classification::InvalidMention.class_suffix(),
            Some("mention-invalid")
        );
    }
}
