//! Mention suggestions while the user is typing an `@name`.
//!
//! Uses the same name spellings as [`crate::roster`], but matches by prefix
//! instead of equality: `@jo` offers John Doe because "john" starts with
//! "jo". Entries are ranked by the earliest strategy that matched, then by
//! roster order.

use crate::roster::MatchStrategy;
use crate::types::RosterEntry;

/// One offered roster entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub entry: RosterEntry,
    /// Highest-priority spelling whose prefix matched the query.
    pub strategy: MatchStrategy,
}

/// Rank roster entries whose name starts with `query`, case-insensitively.
pub fn suggest(query: &str, roster: &[RosterEntry], limit: usize) -> Vec<Suggestion> {
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }
    let query = query.to_lowercase();
    let squashed: String = query.chars().filter(|c| !c.is_whitespace()).collect();

    let mut ranked: Vec<(MatchStrategy, usize, &RosterEntry)> = roster
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            MatchStrategy::ALL
                .iter()
                .copied()
                .find(|strategy| {
                    let needle = match strategy {
                        MatchStrategy::FullNameJoined => &squashed,
                        _ => &query,
                    };
                    strategy.variant(entry).starts_with(needle.as_str())
                })
                .map(|strategy| (strategy, idx, entry))
        })
        .collect();

    ranked.sort_by_key(|(strategy, idx, _)| (*strategy, *idx));
    ranked.truncate(limit);

    ranked
        .into_iter()
        .map(|(strategy, _, entry)| Suggestion {
            entry: entry.clone(),
            strategy,
        })
        .collect()
}

/// The visible suggestion list with a highlighted row.
///
/// Navigation wraps at both ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionList {
    items: Vec<Suggestion>,
    selected: usize,
}

impl SuggestionList {
    pub fn new(items: Vec<Suggestion>) -> Self {
        Self { items, selected: 0 }
    }

    pub fn items(&self) -> &[Suggestion] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn selected_index(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.selected)
    }

    pub fn selected(&self) -> Option<&Suggestion> {
        self.items.get(self.selected)
    }

    pub fn move_down(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    pub fn move_up(&mut self) {
        if !self.items.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.items.len() - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<RosterEntry> {
        vec![
            RosterEntry::new(1, "Alex", "Johnson"),
            RosterEntry::new(2, "John", "Doe"),
            RosterEntry::new(3, "Joanna", "Park"),
            RosterEntry::new(4, "Sam", "Wise"),
        ]
    }

    fn ids(list: &[Suggestion]) -> Vec<i64> {
        list.iter().map(|s| s.entry.id).collect()
    }

    #[test]
    fn test_first_name_prefix_outranks_last_name_prefix() {
        let found = suggest("jo", &roster(), 10);
        // John and Joanna match by first name; Alex Johnson only by last name.
        assert_eq!(ids(&found), vec![2, 3, 1]);
        assert_eq!(found[0].strategy, MatchStrategy::FirstName);
        assert_eq!(found[2].strategy, MatchStrategy::LastName);
    }

    #[test]
    fn test_full_name_prefixes() {
        let found = suggest("John.D", &roster(), 10);
        assert_eq!(ids(&found), vec![2]);
        assert_eq!(found[0].strategy, MatchStrategy::FullNameDotted);

        let found = suggest("johnd", &roster(), 10);
        assert_eq!(ids(&found), vec![2]);
        assert_eq!(found[0].strategy, MatchStrategy::FullNameJoined);
    }

    #[test]
    fn test_limit_and_empty_query() {
        assert_eq!(suggest("jo", &roster(), 1).len(), 1);
        assert!(suggest("", &roster(), 5).is_empty());
        assert!(suggest("jo", &roster(), 0).is_empty());
        assert!(suggest("zzz", &roster(), 5).is_empty());
    }

    #[test]
    fn test_navigation_wraps() {
        let mut list = SuggestionList::new(suggest("jo", &roster(), 10));
        assert_eq!(list.selected_index(), Some(0));
        list.move_up();
        assert_eq!(list.selected_index(), Some(2));
        list.move_down();
        assert_eq!(list.selected_index(), Some(0));
        list.move_down();
        assert_eq!(list.selected().map(|s| s.entry.id), Some(3));
    }

    #[test]
    fn test_navigation_on_empty_list_is_noop() {
        let mut list = SuggestionList::default();
        list.move_down();
        list.move_up();
        assert!(list.selected().is_none());
        assert_eq!(list.selected_index(), None);
    }
}
