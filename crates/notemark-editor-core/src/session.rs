//! One editing session: the engine wired to a surface.
//!
//! The host calls [`AnnotationSession::on_input`] after every text change
//! and [`AnnotationSession::on_key`] for every keystroke the mention
//! machine cares about. Both run synchronously inside the host's handler.

use crate::caret::{CaretPosition, reconcile_caret};
use crate::compose::compose;
use crate::config::EngineConfig;
use crate::guard::RenderGuard;
use crate::mention::{MentionEdit, MentionTracker, MentionTypingState, TypingEvent};
use crate::roster::{RosterProvider, resolve_all};
use crate::submission::{
    NotesApi, SavedNote, SubmissionPayload, SubmitCallback, SubmitError, assemble,
};
use crate::suggest::SuggestionList;
use crate::surface::{EditableSurface, SurfaceError};
use crate::text::{EditorRope, TextBuffer};
use crate::tokenizer::tokenize;
use crate::tree::{build_tree, render_html};
use crate::types::CaretSnapshot;

/// What a render pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Markup identical to what is on the surface; nothing touched.
    Skipped,
    /// Content replaced and caret restored.
    Applied(CaretPosition),
}

impl RenderOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, RenderOutcome::Skipped)
    }
}

/// Engine state for one editing session.
#[derive(Debug, Clone, Default)]
pub struct AnnotationSession {
    config: EngineConfig,
    guard: RenderGuard,
    mention: MentionTracker,
    buffer: EditorRope,
}

impl AnnotationSession {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            mention: MentionTracker::new(&config),
            config,
            guard: RenderGuard::new(),
            buffer: EditorRope::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn mention_state(&self) -> &MentionTypingState {
        self.mention.state()
    }

    /// Suggestions to display, if the list should be visible.
    pub fn suggestions(&self) -> Option<&SuggestionList> {
        self.mention.suggestions()
    }

    /// Re-render the surface after its text changed.
    ///
    /// Tokenize, resolve, compose, and replace the surface content unless
    /// the markup is unchanged. The caret is restored to the same flattened
    /// offset it had before.
    pub fn on_input<S, R>(&mut self, surface: &mut S, roster: &R) -> Result<RenderOutcome, SurfaceError>
    where
        S: EditableSurface + ?Sized,
        R: RosterProvider + ?Sized,
    {
        let text = surface.text();
        let caret = surface.caret();
        self.render(surface, &text, caret, roster)
    }

    /// Feed a keystroke to the mention machine.
    ///
    /// Accepting a suggestion rewrites the surface text and re-renders it.
    /// Returns the applied edit in that case.
    pub fn on_key<S, R>(
        &mut self,
        surface: &mut S,
        event: TypingEvent,
        roster: &R,
    ) -> Result<Option<MentionEdit>, SurfaceError>
    where
        S: EditableSurface + ?Sized,
        R: RosterProvider + ?Sized,
    {
        let Some(mut edit) = self.mention.handle(event, roster.entries()) else {
            return Ok(None);
        };

        self.buffer.set_text(&surface.text());
        // Don't double up the separator if one already follows the query.
        if self
            .buffer
            .char_at(edit.range.end)
            .is_some_and(char::is_whitespace)
        {
            edit.replacement.pop();
        }
        self.buffer.replace(edit.range.clone(), &edit.replacement);

        let text = self.buffer.to_string();
        self.render(surface, &text, CaretSnapshot::new(edit.caret_after), roster)?;
        Ok(Some(edit))
    }

    /// Accept the highlighted suggestion, if any.
    pub fn accept_suggestion<S, R>(
        &mut self,
        surface: &mut S,
        roster: &R,
    ) -> Result<Option<MentionEdit>, SurfaceError>
    where
        S: EditableSurface + ?Sized,
        R: RosterProvider + ?Sized,
    {
        self.on_key(surface, TypingEvent::Accept, roster)
    }

    /// Assemble the surface text and hand it to the notes API.
    ///
    /// Creates a note, or updates `note_id` when given. Returns the payload
    /// that was sent; the outcome arrives through `done`.
    pub fn submit<S, R, A>(
        &self,
        surface: &S,
        title: Option<&str>,
        note_id: Option<i64>,
        roster: &R,
        api: &A,
        done: SubmitCallback,
    ) -> SubmissionPayload
    where
        S: EditableSurface + ?Sized,
        R: RosterProvider + ?Sized,
        A: NotesApi + ?Sized,
    {
        let text = surface.text();
        let tokens = tokenize(&text);
        let resolutions = resolve_all(&tokens, roster.entries());
        let payload = assemble(&text, &tokens, &resolutions, title);

        tracing::info!(
            target: "notemark::submit",
            note_id = ?note_id,
            tags = payload.tags.len(),
            mentions = payload.mention_ids.len(),
            "submitting note"
        );

        let done: SubmitCallback = Box::new(move |result: Result<SavedNote, SubmitError>| {
            match &result {
                Ok(note) => tracing::info!(target: "notemark::submit", id = note.id, "note saved"),
                Err(err) => tracing::warn!(target: "notemark::submit", error = %err, "note not saved"),
            }
            done(result)
        });

        match note_id {
            Some(id) => api.update(id, payload.clone(), done),
            None => api.create(payload.clone(), done),
        }
        payload
    }

    fn render<S, R>(
        &mut self,
        surface: &mut S,
        text: &str,
        caret: CaretSnapshot,
        roster: &R,
    ) -> Result<RenderOutcome, SurfaceError>
    where
        S: EditableSurface + ?Sized,
        R: RosterProvider + ?Sized,
    {
        let tokens = tokenize(text);
        let resolutions = resolve_all(&tokens, roster.entries());
        let segments = compose(text, &tokens, &resolutions);
        let tree = build_tree(&segments);
        let markup = render_html(&tree, &self.config.class_prefix);

        if !self.guard.needs_render(&markup) {
            tracing::trace!(
                target: "notemark::render",
                len = text.len(),
                "markup unchanged, skipping render"
            );
            return Ok(RenderOutcome::Skipped);
        }

        let position = reconcile_caret(caret, &tree);
        if let Err(err) = surface.replace_content(&tree, &markup, position) {
            self.guard.invalidate();
            return Err(err);
        }
        self.guard.mark_applied(&markup);

        tracing::debug!(
            target: "notemark::render",
            tokens = tokens.len(),
            flat_offset = caret.flat_offset,
            leaf = position.leaf_index,
            offset_in_leaf = position.offset_in_leaf,
            "rendered"
        );
        Ok(RenderOutcome::Applied(position))
    }
}
