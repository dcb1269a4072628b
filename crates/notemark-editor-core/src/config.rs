//! Engine tuning knobs.
//!
//! Everything has a default, so an empty config file (or none at all) gives
//! the stock behaviour.

use serde::{Deserialize, Serialize};

use crate::types::RosterEntry;

/// How an accepted suggestion is written back into the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionInsertStyle {
    /// `John.Doe`. Names with inner spaces fall back to the joined
    /// spelling, since a dotted name with a space would not survive
    /// tokenization.
    #[default]
    Dotted,
    /// `JohnDoe`
    Joined,
    /// `John Doe` (only `@John` will be recognised as the mention afterwards)
    Spaced,
}

impl MentionInsertStyle {
    /// Spell `entry`'s name in this style, without the `@`.
    pub fn mention_name(self, entry: &RosterEntry) -> String {
        let squash = |s: &str| s.split_whitespace().collect::<String>();
        match self {
            MentionInsertStyle::Dotted
                if !entry.first_name.contains(char::is_whitespace)
                    && !entry.last_name.contains(char::is_whitespace) =>
            {
                format!("{}.{}", entry.first_name, entry.last_name)
            }
            MentionInsertStyle::Dotted | MentionInsertStyle::Joined => {
                format!("{}{}", squash(&entry.first_name), squash(&entry.last_name))
            }
            MentionInsertStyle::Spaced => format!("{} {}", entry.first_name, entry.last_name),
        }
    }
}

/// Configuration for an annotation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Query length at which the suggestion list becomes visible.
    pub suggestion_min_query: usize,
    /// Maximum number of suggestions offered.
    pub suggestion_limit: usize,
    pub mention_insert_style: MentionInsertStyle,
    /// Prefix for the semantic class names in rendered markup.
    pub class_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            suggestion_min_query: 2,
            suggestion_limit: 5,
            mention_insert_style: MentionInsertStyle::default(),
            class_prefix: "nm".to_owned(),
        }
    }
}
