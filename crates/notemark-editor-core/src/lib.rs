//! notemark-editor-core: live hashtag and mention annotation for note editors.
//!
//! This crate provides:
//! - `tokenize` - hashtag/mention scanning over raw text
//! - `resolve` - mention resolution against a roster with ordered name strategies
//! - `compose`, `build_tree`, `render_html` - classified output that never alters the text
//! - `reconcile_caret` - caret restoration after the surface content is replaced
//! - `MentionTracker` - the mention-typing state machine and suggestions
//! - `assemble`, `NotesApi` - submission handoff
//! - `AnnotationSession` - all of the above wired to an `EditableSurface`

pub mod caret;
pub mod compose;
pub mod config;
pub mod guard;
pub mod mention;
pub mod roster;
pub mod session;
pub mod submission;
pub mod suggest;
pub mod surface;
pub mod text;
pub mod tokenizer;
pub mod tree;
pub mod types;

pub use caret::{CaretPosition, flat_offset_from_utf16, flat_offset_of, reconcile_caret};
pub use compose::{compose, compose_text, flatten};
pub use config::{EngineConfig, MentionInsertStyle};
pub use guard::{RenderGuard, hash_source};
pub use mention::{MentionEdit, MentionTracker, MentionTypingState, TypingEvent};
pub use roster::{MatchStrategy, RosterProvider, find_match, resolve, resolve_all, resolve_name};
pub use session::{AnnotationSession, RenderOutcome};
pub use smol_str::SmolStr;
pub use submission::{
    FieldErrors, NotesApi, SavedNote, SubmissionPayload, SubmitCallback, SubmitError, assemble,
};
pub use suggest::{Suggestion, SuggestionList, suggest};
pub use surface::{EditableSurface, HeadlessSurface, SurfaceError};
pub use text::{EditorRope, TextBuffer};
pub use tokenizer::{tokenize, token_at};
pub use tree::{RenderedNode, build_tree, render_html, text_leaves, tree_text};
pub use types::{
    CaretSnapshot, Classification, ResolvedMention, RosterEntry, Segment, Token, TokenKind,
};
