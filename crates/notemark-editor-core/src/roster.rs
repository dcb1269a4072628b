//! Resolving mention tokens against a roster of known people.
//!
//! Users type mentions inconsistently (`@John`, `@JohnDoe`, `@John.Doe`), so
//! a candidate name is compared against several spellings of each entry's
//! name. Strategies are tried in a fixed order and the first match wins.
//! Within one strategy, roster order breaks ties. Comparison ignores case.
//!
//! The same rule set backs display-time resolution and typing-time
//! suggestions, see [`crate::suggest`].

use crate::types::{ResolvedMention, RosterEntry, Token};

/// Source of roster snapshots, implemented by the consuming application.
///
/// The snapshot is read once per render pass and treated as immutable for
/// the duration of that pass.
pub trait RosterProvider {
    fn entries(&self) -> &[RosterEntry];
}

impl RosterProvider for Vec<RosterEntry> {
    fn entries(&self) -> &[RosterEntry] {
        self
    }
}

impl RosterProvider for [RosterEntry] {
    fn entries(&self) -> &[RosterEntry] {
        self
    }
}

/// Unit type implementation - empty roster, every mention is invalid.
impl RosterProvider for () {
    fn entries(&self) -> &[RosterEntry] {
        &[]
    }
}

impl<T: RosterProvider + ?Sized> RosterProvider for &T {
    fn entries(&self) -> &[RosterEntry] {
        (*self).entries()
    }
}

impl<T: RosterProvider> RosterProvider for Option<T> {
    fn entries(&self) -> &[RosterEntry] {
        self.as_ref().map(|r| r.entries()).unwrap_or(&[])
    }
}

/// One way of spelling a roster entry's name, in match-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchStrategy {
    /// `John`
    FirstName,
    /// `Doe`
    LastName,
    /// `John Doe`
    FullNameSpaced,
    /// `JohnDoe`, with any inner spaces removed
    FullNameJoined,
    /// `John.Doe`
    FullNameDotted,
}

impl MatchStrategy {
    pub const ALL: [MatchStrategy; 5] = [
        MatchStrategy::FirstName,
        MatchStrategy::LastName,
        MatchStrategy::FullNameSpaced,
        MatchStrategy::FullNameJoined,
        MatchStrategy::FullNameDotted,
    ];

    /// This strategy's spelling of `entry`'s name, lowercased.
    pub fn variant(self, entry: &RosterEntry) -> String {
        let spelled = match self {
            MatchStrategy::FirstName => entry.first_name.clone(),
            MatchStrategy::LastName => entry.last_name.clone(),
            MatchStrategy::FullNameSpaced => format!("{} {}", entry.first_name, entry.last_name),
            MatchStrategy::FullNameJoined => strip_spaces(&format!(
                "{}{}",
                entry.first_name, entry.last_name
            )),
            MatchStrategy::FullNameDotted => format!("{}.{}", entry.first_name, entry.last_name),
        };
        spelled.to_lowercase()
    }

    /// Whether `candidate` (already lowercased) names `entry` under this strategy.
    fn matches(self, entry: &RosterEntry, candidate: &str) -> bool {
        match self {
            MatchStrategy::FullNameJoined => self.variant(entry) == strip_spaces(candidate),
            _ => self.variant(entry) == candidate,
        }
    }
}

fn strip_spaces(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Find the roster entry a candidate name refers to, and the strategy that matched.
///
/// Empty candidates never match.
pub fn find_match<'r>(
    candidate: &str,
    roster: &'r [RosterEntry],
) -> Option<(&'r RosterEntry, MatchStrategy)> {
    if candidate.trim().is_empty() {
        return None;
    }
    let candidate = candidate.to_lowercase();

    MatchStrategy::ALL.iter().find_map(|&strategy| {
        roster
            .iter()
            .find(|entry| strategy.matches(entry, &candidate))
            .map(|entry| (entry, strategy))
    })
}

/// Resolve a bare name (no sigil) to a roster entry.
pub fn resolve_name<'r>(candidate: &str, roster: &'r [RosterEntry]) -> Option<&'r RosterEntry> {
    find_match(candidate, roster).map(|(entry, _)| entry)
}

/// Resolve one token against the roster.
///
/// Hashtags never resolve; they come back with `entry == None`.
pub fn resolve(token: &Token, roster: &[RosterEntry]) -> ResolvedMention {
    let entry = if token.is_mention() {
        resolve_name(token.name(), roster).cloned()
    } else {
        None
    };

    tracing::trace!(
        target: "notemark::roster",
        mention = %token.raw_text,
        resolved = ?entry.as_ref().map(|e| e.id),
        "resolved mention"
    );

    ResolvedMention {
        token: token.clone(),
        entry,
    }
}

/// Resolve every mention token, in document order. Hashtags are skipped.
pub fn resolve_all(tokens: &[Token], roster: &[RosterEntry]) -> Vec<ResolvedMention> {
    tokens
        .iter()
        .filter(|t| t.is_mention())
        .map(|t| resolve(t, roster))
        .collect()
}
