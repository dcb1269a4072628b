//! Mention-typing state machine.
//!
//! Tracks whether the user is in the middle of typing an `@mention`, which
//! drives the visibility of the suggestion list:
//!
//! - `Idle` → typing `@` → `Composing` with an empty query.
//! - Non-whitespace typed inside the query extends it. Once the query
//!   reaches the configured minimum length the state becomes
//!   `SuggestionsVisible`; dropping below it goes back to `Composing`.
//! - Whitespace, a caret move outside the query, deleting the `@`, or an
//!   explicit dismiss all return to `Idle`.
//! - Accepting a suggestion yields a [`MentionEdit`] replacing the query and
//!   returns to `Idle`.
//!
//! `anchor` is the char offset of the first query character, i.e. just after
//! the `@`, so the query always occupies `anchor..anchor + len(query)`.

use std::ops::Range;

use smol_str::SmolStr;

use crate::config::{EngineConfig, MentionInsertStyle};
use crate::suggest::{SuggestionList, suggest};
use crate::types::RosterEntry;

/// Where the user is in composing a mention.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MentionTypingState {
    #[default]
    Idle,
    Composing { query: SmolStr, anchor: usize },
    SuggestionsVisible { query: SmolStr, anchor: usize },
}

impl MentionTypingState {
    /// `(query, anchor)` unless idle.
    pub fn query(&self) -> Option<(&str, usize)> {
        match self {
            MentionTypingState::Idle => None,
            MentionTypingState::Composing { query, anchor }
            | MentionTypingState::SuggestionsVisible { query, anchor } => {
                Some((query.as_str(), *anchor))
            }
        }
    }

    /// Char range occupied by the query.
    pub fn query_range(&self) -> Option<Range<usize>> {
        self.query()
            .map(|(query, anchor)| anchor..anchor + query.chars().count())
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, MentionTypingState::Idle)
    }

    pub fn suggestions_visible(&self) -> bool {
        matches!(self, MentionTypingState::SuggestionsVisible { .. })
    }

    fn label(&self) -> &'static str {
        match self {
            MentionTypingState::Idle => "idle",
            MentionTypingState::Composing { .. } => "composing",
            MentionTypingState::SuggestionsVisible { .. } => "suggestions_visible",
        }
    }
}

/// Input the state machine reacts to.
///
/// Offsets are the caret position (in chars) after the host applied the
/// keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingEvent {
    /// A character was inserted and the caret now sits after it.
    Typed { ch: char, caret_after: usize },
    /// The character before the caret was deleted.
    Backspace { caret_after: usize },
    /// The caret moved without editing (click, arrow keys outside the list).
    CaretMoved(usize),
    /// Highlight the next suggestion.
    SelectNext,
    /// Highlight the previous suggestion.
    SelectPrevious,
    /// Take the highlighted suggestion.
    Accept,
    /// Close the suggestion list (Escape).
    Dismiss,
}

/// Text replacement produced by accepting a suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionEdit {
    /// Char range to replace: the query, without the `@`.
    pub range: Range<usize>,
    /// Mention name followed by a single space.
    pub replacement: String,
    /// Caret position once the replacement is applied.
    pub caret_after: usize,
    pub entry: RosterEntry,
}

/// Long-lived mention-typing tracker for one editing session.
#[derive(Debug, Clone)]
pub struct MentionTracker {
    state: MentionTypingState,
    suggestions: SuggestionList,
    min_query: usize,
    limit: usize,
    insert_style: MentionInsertStyle,
}

impl Default for MentionTracker {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl MentionTracker {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            state: MentionTypingState::Idle,
            suggestions: SuggestionList::default(),
            min_query: config.suggestion_min_query,
            limit: config.suggestion_limit,
            insert_style: config.mention_insert_style,
        }
    }

    pub fn state(&self) -> &MentionTypingState {
        &self.state
    }

    /// The suggestion list, only while it should be shown.
    pub fn suggestions(&self) -> Option<&SuggestionList> {
        self.state.suggestions_visible().then_some(&self.suggestions)
    }

    /// Feed one event. Returns an edit when a suggestion was accepted.
    pub fn handle(&mut self, event: TypingEvent, roster: &[RosterEntry]) -> Option<MentionEdit> {
        match event {
            TypingEvent::Typed { ch, caret_after } => {
                self.on_typed(ch, caret_after, roster);
                None
            }
            TypingEvent::Backspace { caret_after } => {
                self.on_backspace(caret_after, roster);
                None
            }
            TypingEvent::CaretMoved(offset) => {
                if let Some(range) = self.state.query_range() {
                    if offset < range.start || offset > range.end {
                        self.reset();
                    }
                }
                None
            }
            TypingEvent::SelectNext => {
                if self.state.suggestions_visible() {
                    self.suggestions.move_down();
                }
                None
            }
            TypingEvent::SelectPrevious => {
                if self.state.suggestions_visible() {
                    self.suggestions.move_up();
                }
                None
            }
            TypingEvent::Accept => self.accept(),
            TypingEvent::Dismiss => {
                self.reset();
                None
            }
        }
    }

    fn on_typed(&mut self, ch: char, caret_after: usize, roster: &[RosterEntry]) {
        if ch.is_whitespace() {
            self.reset();
            return;
        }
        let inserted_at = caret_after.saturating_sub(1);

        if let Some((query, anchor)) = self.state.query() {
            let query_len = query.chars().count();
            if (anchor..=anchor + query_len).contains(&inserted_at) {
                let split = inserted_at - anchor;
                let mut next: String = query.chars().take(split).collect();
                next.push(ch);
                next.extend(query.chars().skip(split));
                self.settle(SmolStr::new(next), anchor, roster);
                return;
            }
            // Typed somewhere else without a caret event in between.
            self.reset();
        }

        if ch == '@' {
            self.settle(SmolStr::default(), caret_after, roster);
        }
    }

    fn on_backspace(&mut self, caret_after: usize, roster: &[RosterEntry]) {
        let Some((query, anchor)) = self.state.query() else {
            return;
        };
        let query_len = query.chars().count();

        // Deleted the `@` itself.
        if caret_after + 1 == anchor {
            self.reset();
            return;
        }
        if !(anchor..anchor + query_len).contains(&caret_after) {
            self.reset();
            return;
        }

        let removed = caret_after - anchor;
        let next: String = query
            .chars()
            .enumerate()
            .filter(|(i, _)| *i != removed)
            .map(|(_, c)| c)
            .collect();
        self.settle(SmolStr::new(next), anchor, roster);
    }

    fn accept(&mut self) -> Option<MentionEdit> {
        let MentionTypingState::SuggestionsVisible { .. } = &self.state else {
            return None;
        };
        let range = self.state.query_range()?;
        let entry = self.suggestions.selected()?.entry.clone();

        let name = self.insert_style.mention_name(&entry);
        let caret_after = range.start + name.chars().count() + 1;
        let edit = MentionEdit {
            range,
            replacement: format!("{name} "),
            caret_after,
            entry,
        };

        tracing::debug!(
            target: "notemark::mention",
            roster_id = edit.entry.id,
            replacement = %edit.replacement,
            "accepted mention suggestion"
        );
        self.reset();
        Some(edit)
    }

    /// Move to `Composing` or `SuggestionsVisible` depending on query length.
    fn settle(&mut self, query: SmolStr, anchor: usize, roster: &[RosterEntry]) {
        let query_changed = self.state.query().map(|(q, _)| q) != Some(query.as_str());
        let next = if query.chars().count() >= self.min_query {
            if query_changed || !self.state.suggestions_visible() {
                self.suggestions = SuggestionList::new(suggest(&query, roster, self.limit));
            }
            MentionTypingState::SuggestionsVisible { query, anchor }
        } else {
            self.suggestions = SuggestionList::default();
            MentionTypingState::Composing { query, anchor }
        };
        self.transition(next);
    }

    fn reset(&mut self) {
        self.suggestions = SuggestionList::default();
        self.transition(MentionTypingState::Idle);
    }

    fn transition(&mut self, next: MentionTypingState) {
        if self.state.label() != next.label() {
            tracing::debug!(
                target: "notemark::mention",
                from = self.state.label(),
                to = next.label(),
                query = ?next.query().map(|(q, _)| q),
                "mention state transition"
            );
        }
        self.state = next;
    }
}
