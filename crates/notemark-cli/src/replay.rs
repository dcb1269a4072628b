//! Replaying keystrokes into a headless surface.
//!
//! A replay script is plain text typed one char at a time. Named keys go in
//! braces: `{up}`, `{down}`, `{left}`, `{right}`, `{enter}`, `{tab}`,
//! `{esc}`, `{bs}`. Anything else in braces is typed literally.

use notemark_editor_core::{
    AnnotationSession, EditableSurface, HeadlessSurface, RenderOutcome, RosterEntry, SurfaceError,
    TypingEvent,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Tab,
    Escape,
    Backspace,
}

impl Key {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            "enter" => Key::Enter,
            "tab" => Key::Tab,
            "esc" => Key::Escape,
            "bs" => Key::Backspace,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Char(char),
    Key(Key),
}

pub fn parse_script(script: &str) -> Vec<Step> {
    let mut steps = Vec::new();
    let mut rest = script;

    while let Some(ch) = rest.chars().next() {
        if ch == '{' {
            if let Some(close) = rest.find('}') {
                if let Some(key) = Key::from_name(&rest[1..close]) {
                    steps.push(Step::Key(key));
                    rest = &rest[close + 1..];
                    continue;
                }
            }
        }
        steps.push(Step::Char(ch));
        rest = &rest[ch.len_utf8()..];
    }
    steps
}

/// Counters reported after a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub renders: usize,
    pub skipped: usize,
    pub accepted: usize,
}

pub fn replay(
    session: &mut AnnotationSession,
    surface: &mut HeadlessSurface,
    steps: &[Step],
    roster: &[RosterEntry],
) -> Result<ReplayStats, SurfaceError> {
    let mut stats = ReplayStats::default();

    for step in steps {
        // Enter and Tab take the highlighted suggestion when the list is up.
        let accepting = matches!(step, Step::Key(Key::Enter | Key::Tab))
            && session.suggestions().is_some_and(|list| !list.is_empty());
        if accepting {
            if session.accept_suggestion(surface, roster)?.is_some() {
                stats.accepted += 1;
            }
            continue;
        }

        let event = match step {
            Step::Char(ch) => Some(surface.type_char(*ch)),
            Step::Key(Key::Enter) => Some(surface.type_char('\n')),
            Step::Key(Key::Tab) => Some(surface.type_char('\t')),
            Step::Key(Key::Backspace) => surface.backspace(),
            Step::Key(Key::Left) => {
                let caret = surface.caret().flat_offset;
                Some(surface.set_caret(caret.saturating_sub(1)))
            }
            Step::Key(Key::Right) => {
                let caret = surface.caret().flat_offset;
                Some(surface.set_caret(caret + 1))
            }
            Step::Key(Key::Up) => Some(TypingEvent::SelectPrevious),
            Step::Key(Key::Down) => Some(TypingEvent::SelectNext),
            Step::Key(Key::Escape) => Some(TypingEvent::Dismiss),
        };
        let Some(event) = event else {
            continue;
        };

        if matches!(event, TypingEvent::Typed { .. } | TypingEvent::Backspace { .. }) {
            match session.on_input(surface, roster)? {
                RenderOutcome::Skipped => stats.skipped += 1,
                RenderOutcome::Applied(_) => stats.renders += 1,
            }
        }
        session.on_key(surface, event, roster)?;

        tracing::debug!(
            target: "notemark::replay",
            step = ?step,
            caret = surface.caret().flat_offset,
            state = ?session.mention_state(),
            suggestions = ?session.suggestions().map(|list| {
                list.items().iter().map(|s| s.entry.full_name()).collect::<Vec<_>>()
            }),
            "step"
        );
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notemark_editor_core::EngineConfig;

    #[test]
    fn test_parse_script() {
        assert_eq!(
            parse_script("@a{down}{enter}{x}"),
            vec![
                Step::Char('@'),
                Step::Char('a'),
                Step::Key(Key::Down),
                Step::Key(Key::Enter),
                Step::Char('{'),
                Step::Char('x'),
                Step::Char('}'),
            ]
        );
        assert_eq!(parse_script("{"), vec![Step::Char('{')]);
    }

    #[test]
    fn test_replay_accepts_second_suggestion() {
        let roster = vec![
            RosterEntry::new(5, "John", "Doe"),
            RosterEntry::new(6, "Joanna", "Park"),
        ];
        let mut session = AnnotationSession::new(EngineConfig::default());
        let mut surface = HeadlessSurface::new();

        let stats = replay(
            &mut session,
            &mut surface,
            &parse_script("cc @jo{down}{enter}#ok"),
            &roster,
        )
        .unwrap();

        assert_eq!(surface.text(), "cc @Joanna.Park #ok");
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.skipped, 0);
    }

    #[test]
    fn test_enter_without_suggestions_is_a_newline() {
        let mut session = AnnotationSession::default();
        let mut surface = HeadlessSurface::new();
        replay(&mut session, &mut surface, &parse_script("a{enter}b{bs}"), &[]).unwrap();
        assert_eq!(surface.text(), "a\n");
    }
}
