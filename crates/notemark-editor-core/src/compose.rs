//! Splitting text into classified segments.
//!
//! The composer never changes the character sequence. It only decides how
//! each stretch is classified. Concatenating the segment texts gives back
//! the input exactly, which is what lets a caret offset measured against
//! the raw text stay valid against the rendered output.

use std::collections::HashMap;

use smol_str::SmolStr;

use crate::roster::resolve_all;
use crate::tokenizer::tokenize;
use crate::types::{Classification, ResolvedMention, RosterEntry, Segment, Token, TokenKind};

/// Compose classified segments from text, its tokens, and mention resolutions.
///
/// Tokens must be sorted and non-overlapping, as [`tokenize`] produces them.
/// A mention token with no matching resolution renders as invalid.
pub fn compose(text: &str, tokens: &[Token], resolutions: &[ResolvedMention]) -> Vec<Segment> {
    let by_start: HashMap<usize, &ResolvedMention> = resolutions
        .iter()
        .map(|r| (r.token.start, r))
        .collect();

    // Byte offset of every char boundary, including the end.
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(b, _)| b)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_len = boundaries.len() - 1;
    let slice = |start: usize, end: usize| SmolStr::new(&text[boundaries[start]..boundaries[end]]);

    let mut segments = Vec::with_capacity(tokens.len() * 2 + 1);
    let mut cursor = 0;

    for token in tokens {
        debug_assert!(
            token.start >= cursor && token.end <= char_len && token.start < token.end,
            "tokens must be sorted, disjoint and in bounds: {token:?}"
        );
        if token.start < cursor || token.end > char_len || token.start >= token.end {
            continue;
        }

        if token.start > cursor {
            segments.push(Segment {
                text: slice(cursor, token.start),
                classification: Classification::PlainText,
                char_range: cursor..token.start,
                roster_id: None,
            });
        }

        let (classification, roster_id) = match token.kind {
            TokenKind::Hashtag => (Classification::Hashtag, None),
            TokenKind::Mention => match by_start.get(&token.start).and_then(|r| r.entry_id()) {
                Some(id) => (Classification::ValidMention, Some(id)),
                None => (Classification::InvalidMention, None),
            },
        };

        segments.push(Segment {
            text: slice(token.start, token.end),
            classification,
            char_range: token.char_range(),
            roster_id,
        });
        cursor = token.end;
    }

    if cursor < char_len {
        segments.push(Segment {
            text: slice(cursor, char_len),
            classification: Classification::PlainText,
            char_range: cursor..char_len,
            roster_id: None,
        });
    }

    segments
}

/// Tokenize, resolve and compose in one call.
///
/// A pure function of `(text, roster)`.
pub fn compose_text(text: &str, roster: &[RosterEntry]) -> Vec<Segment> {
    let tokens = tokenize(text);
    let resolutions = resolve_all(&tokens, roster);
    compose(text, &tokens, &resolutions)
}

/// Concatenate segment texts. Equals the composed input.
pub fn flatten(segments: &[Segment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}
