//! The editable surface the engine renders into.
//!
//! The host owns the widget (a contenteditable element, a native text view,
//! a terminal buffer). The engine only needs to read the text and caret as
//! flattened char offsets and to hand back a rendered tree with the caret
//! position to restore.

use crate::caret::{CaretPosition, flat_offset_of};
use crate::mention::TypingEvent;
use crate::text::{EditorRope, TextBuffer};
use crate::tree::{RenderedNode, tree_text};
use crate::types::CaretSnapshot;

/// Errors a host can report when asked to replace its content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("surface is no longer attached")]
    Detached,
    #[error("surface rejected the rendered content: {0}")]
    Rejected(String),
}

/// Host-owned editable widget.
pub trait EditableSurface {
    /// Current raw text.
    fn text(&self) -> String;

    /// Current caret as a flattened char offset.
    fn caret(&self) -> CaretSnapshot;

    /// Replace the displayed content with `tree` and put the caret at
    /// `caret`.
    ///
    /// `markup` is the HTML serialization of `tree`, for hosts that take
    /// markup rather than nodes. The flattened text of `tree` becomes the
    /// surface text.
    fn replace_content(
        &mut self,
        tree: &[RenderedNode],
        markup: &str,
        caret: CaretPosition,
    ) -> Result<(), SurfaceError>;
}

impl<T: EditableSurface + ?Sized> EditableSurface for &mut T {
    fn text(&self) -> String {
        (**self).text()
    }

    fn caret(&self) -> CaretSnapshot {
        (**self).caret()
    }

    fn replace_content(
        &mut self,
        tree: &[RenderedNode],
        markup: &str,
        caret: CaretPosition,
    ) -> Result<(), SurfaceError> {
        (**self).replace_content(tree, markup, caret)
    }
}

/// In-memory surface with no display.
///
/// Used by the CLI replay and in tests. Editing helpers return the
/// [`TypingEvent`] a real host would report for the same keystroke.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    text: EditorRope,
    caret: usize,
    markup: String,
    tree: Vec<RenderedNode>,
    replacements: usize,
    last_caret: Option<CaretPosition>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface holding `text` with the caret at its end.
    pub fn with_text(text: &str) -> Self {
        let text = EditorRope::from_str(text);
        let caret = text.len_chars();
        Self {
            text,
            caret,
            ..Self::default()
        }
    }

    /// Insert `ch` at the caret.
    pub fn type_char(&mut self, ch: char) -> TypingEvent {
        let mut buf = [0u8; 4];
        self.text.insert(self.caret, ch.encode_utf8(&mut buf));
        self.caret += 1;
        TypingEvent::Typed {
            ch,
            caret_after: self.caret,
        }
    }

    /// Delete the char before the caret. None at the start of the text.
    pub fn backspace(&mut self) -> Option<TypingEvent> {
        if self.caret == 0 {
            return None;
        }
        self.caret -= 1;
        self.text.delete(self.caret..self.caret + 1);
        Some(TypingEvent::Backspace {
            caret_after: self.caret,
        })
    }

    /// Move the caret, clamped to the text.
    pub fn set_caret(&mut self, offset: usize) -> TypingEvent {
        self.caret = offset.min(self.text.len_chars());
        TypingEvent::CaretMoved(self.caret)
    }

    /// Markup last applied by the engine.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn tree(&self) -> &[RenderedNode] {
        &self.tree
    }

    /// How many times the content was replaced.
    pub fn replacements(&self) -> usize {
        self.replacements
    }

    /// Caret position the engine asked for on the last replacement.
    pub fn last_caret(&self) -> Option<CaretPosition> {
        self.last_caret
    }
}

impl EditableSurface for HeadlessSurface {
    fn text(&self) -> String {
        self.text.to_string()
    }

    fn caret(&self) -> CaretSnapshot {
        CaretSnapshot::new(self.caret)
    }

    fn replace_content(
        &mut self,
        tree: &[RenderedNode],
        markup: &str,
        caret: CaretPosition,
    ) -> Result<(), SurfaceError> {
        self.text.set_text(&tree_text(tree));
        self.caret = flat_offset_of(tree, caret);
        self.markup = markup.to_owned();
        self.tree = tree.to_vec();
        self.replacements += 1;
        self.last_caret = Some(caret);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_reports_caret_after() {
        let mut surface = HeadlessSurface::new();
        assert_eq!(
            surface.type_char('@'),
            TypingEvent::Typed {
                ch: '@',
                caret_after: 1
            }
        );
        surface.type_char('é');
        assert_eq!(surface.text(), "@é");
        assert_eq!(surface.caret(), CaretSnapshot::new(2));
    }

    #[test]
    fn test_backspace_and_caret_moves() {
        let mut surface = HeadlessSurface::with_text("abc");
        assert_eq!(surface.set_caret(1), TypingEvent::CaretMoved(1));
        assert_eq!(
            surface.backspace(),
            Some(TypingEvent::Backspace { caret_after: 0 })
        );
        assert_eq!(surface.text(), "bc");
        assert_eq!(surface.backspace(), None);
        assert_eq!(surface.set_caret(99), TypingEvent::CaretMoved(2));
    }

    #[test]
    fn test_replace_content_adopts_tree_text() {
        let mut surface = HeadlessSurface::with_text("old");
        let tree = vec![RenderedNode::Text("new text".into())];
        let caret = CaretPosition {
            leaf_index: 0,
            offset_in_leaf: 3,
            utf16_offset_in_leaf: 3,
            fell_back: false,
        };
        surface.replace_content(&tree, "new text", caret).unwrap();
        assert_eq!(surface.text(), "new text");
        assert_eq!(surface.caret(), CaretSnapshot::new(3));
        assert_eq!(surface.replacements(), 1);
    }
}
