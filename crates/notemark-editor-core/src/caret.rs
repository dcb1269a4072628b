//! Caret reconciliation after the rendered tree is replaced.
//!
//! The caret is tracked as a flattened char offset. After a re-render, the
//! offset is mapped onto the new tree by walking its text leaves in order.
//! Because composition never changes the character sequence, the same
//! offset names the same spot in the new tree.
//!
//! Reconciliation is total: an offset past the end of the tree lands at
//! the end of the last leaf, and an empty tree yields a caret at its start.

use crate::tree::{RenderedNode, text_leaves};
use crate::types::CaretSnapshot;

/// Where to put the caret in a rendered tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaretPosition {
    /// Index into the tree's text leaves, in document order.
    pub leaf_index: usize,
    /// Offset inside that leaf, in chars.
    pub offset_in_leaf: usize,
    /// Same offset in UTF-16 code units, for hosts that index text that way.
    pub utf16_offset_in_leaf: usize,
    /// True when the requested offset could not be placed and the caret was
    /// put at the end of the content instead.
    pub fell_back: bool,
}

/// Map a flattened caret offset onto `tree`.
///
/// Walks the text leaves accumulating lengths until the running total
/// reaches the offset. At a boundary between two leaves the caret stays at
/// the end of the earlier one.
pub fn reconcile_caret(before: CaretSnapshot, tree: &[RenderedNode]) -> CaretPosition {
    let leaves = text_leaves(tree);
    let target = before.flat_offset;
    let mut running = 0;

    for (leaf_index, leaf) in leaves.iter().enumerate() {
        let leaf_len = leaf.chars().count();
        if running + leaf_len >= target {
            let offset_in_leaf = (target - running).min(leaf_len);
            return CaretPosition {
                leaf_index,
                offset_in_leaf,
                utf16_offset_in_leaf: utf16_len(leaf, offset_in_leaf),
                fell_back: false,
            };
        }
        running += leaf_len;
    }

    let Some((last_index, last)) = leaves.iter().enumerate().last() else {
        if target > 0 {
            tracing::warn!(
                target: "notemark::caret",
                flat_offset = target,
                "caret offset on empty tree, placing at start"
            );
        }
        return CaretPosition {
            fell_back: target > 0,
            ..CaretPosition::default()
        };
    };

    tracing::warn!(
        target: "notemark::caret",
        flat_offset = target,
        tree_len = running,
        "caret offset past end of rendered tree, placing at end"
    );
    let leaf_len = last.chars().count();
    CaretPosition {
        leaf_index: last_index,
        offset_in_leaf: leaf_len,
        utf16_offset_in_leaf: utf16_len(last, leaf_len),
        fell_back: true,
    }
}

/// Inverse of [`reconcile_caret`]: the flattened offset of a caret position.
///
/// Offsets beyond the leaf (or leaves beyond the tree) clamp to the end.
pub fn flat_offset_of(tree: &[RenderedNode], position: CaretPosition) -> usize {
    let leaves = text_leaves(tree);
    let before: usize = leaves
        .iter()
        .take(position.leaf_index)
        .map(|leaf| leaf.chars().count())
        .sum();
    let within = leaves
        .get(position.leaf_index)
        .map(|leaf| position.offset_in_leaf.min(leaf.chars().count()))
        .unwrap_or(0);
    before + within
}

/// Flattened offset for a host-reported caret given as a UTF-16 offset
/// inside a text leaf, which is how browser selections report it.
///
/// Returns `None` if the leaf does not exist.
pub fn flat_offset_from_utf16(
    tree: &[RenderedNode],
    leaf_index: usize,
    utf16_offset: usize,
) -> Option<CaretSnapshot> {
    let leaves = text_leaves(tree);
    let leaf = leaves.get(leaf_index)?;
    let before: usize = leaves[..leaf_index]
        .iter()
        .map(|leaf| leaf.chars().count())
        .sum();

    let mut utf16_seen = 0;
    let mut chars_in = 0;
    for c in leaf.chars() {
        if utf16_seen >= utf16_offset {
            break;
        }
        utf16_seen += c.len_utf16();
        chars_in += 1;
    }

    Some(CaretSnapshot::new(before + chars_in))
}

fn utf16_len(leaf: &str, chars: usize) -> usize {
    leaf.chars().take(chars).map(char::len_utf16).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::compose_text;
    use crate::tree::build_tree;
    use crate::types::RosterEntry;

    fn tree_for(text: &str) -> Vec<RenderedNode> {
        let roster = vec![RosterEntry::new(5, "John", "Doe")];
        build_tree(&compose_text(text, &roster))
    }

    #[test]
    fn test_round_trip_every_offset() {
        let corpus = [
            "",
            "x",
            "Ask @John about #budget",
            "#a#b @John\t#c\n@x",
            "café 🎉 #thé @zoë",
            "@",
            "trailing space ",
        ];
        for text in corpus {
            let tree = tree_for(text);
            for offset in 0..=text.chars().count() {
                let pos = reconcile_caret(CaretSnapshot::new(offset), &tree);
                assert!(!pos.fell_back, "fell back at {offset} in {text:?}");
                assert_eq!(flat_offset_of(&tree, pos), offset, "offset {offset} in {text:?}");
            }
        }
    }

    #[test]
    fn test_boundary_prefers_earlier_leaf() {
        // Leaves: "Ask " | "@John" | " about"
        let tree = tree_for("Ask @John about");
        let pos = reconcile_caret(CaretSnapshot::new(4), &tree);
        assert_eq!((pos.leaf_index, pos.offset_in_leaf), (0, 4));
        let pos = reconcile_caret(CaretSnapshot::new(9), &tree);
        assert_eq!((pos.leaf_index, pos.offset_in_leaf), (1, 5));
        let pos = reconcile_caret(CaretSnapshot::new(10), &tree);
        assert_eq!((pos.leaf_index, pos.offset_in_leaf), (2, 1));
    }

    #[test]
    fn test_offset_past_end_falls_back_to_end() {
        let tree = tree_for("hi #there");
        let pos = reconcile_caret(CaretSnapshot::new(100), &tree);
        assert!(pos.fell_back);
        assert_eq!((pos.leaf_index, pos.offset_in_leaf), (1, 6));
        assert_eq!(flat_offset_of(&tree, pos), 9);
    }

    #[test]
    fn test_empty_tree() {
        let pos = reconcile_caret(CaretSnapshot::new(0), &[]);
        assert_eq!(pos, CaretPosition::default());
        let pos = reconcile_caret(CaretSnapshot::new(3), &[]);
        assert!(pos.fell_back);
        assert_eq!(flat_offset_of(&[], pos), 0);
    }

    #[test]
    fn test_utf16_offsets() {
        // "🎉" is one char but two UTF-16 units.
        let tree = tree_for("🎉 #go");
        let pos = reconcile_caret(CaretSnapshot::new(2), &tree);
        assert_eq!(pos.leaf_index, 0);
        assert_eq!(pos.offset_in_leaf, 2);
        assert_eq!(pos.utf16_offset_in_leaf, 3);

        assert_eq!(
            flat_offset_from_utf16(&tree, 0, 3),
            Some(CaretSnapshot::new(2))
        );
        assert_eq!(
            flat_offset_from_utf16(&tree, 1, 2),
            Some(CaretSnapshot::new(4))
        );
        assert_eq!(flat_offset_from_utf16(&tree, 5, 0), None);
    }
}
