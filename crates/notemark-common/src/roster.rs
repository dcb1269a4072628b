//! Roster files: a JSON array of entries as the directory service emits them.

use notemark_editor_core::RosterEntry;
use std::path::Path;

use crate::error::{NotemarkError, ParseError};

/// Read a roster file.
pub fn load_roster(path: impl AsRef<Path>) -> Result<Vec<RosterEntry>, NotemarkError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|err| NotemarkError::io(path, err))?;
    let roster = parse_roster(&path.display().to_string(), source)?;
    tracing::debug!(
        target: "notemark::roster",
        path = %path.display(),
        entries = roster.len(),
        "loaded roster"
    );
    Ok(roster)
}

/// Parse roster JSON. `name` labels the source in diagnostics.
pub fn parse_roster(name: &str, source: String) -> Result<Vec<RosterEntry>, ParseError> {
    serde_json::from_str(&source).map_err(|err| {
        ParseError::json(err, name, source.clone())
            .with_advice("expected an array of {\"id\", \"firstName\", \"lastName\", \"email\"?}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_camel_case_entries() {
        let roster = parse_roster(
            "roster.json",
            r#"[
                {"id": 5, "firstName": "John", "lastName": "Doe"},
                {"id": 7, "firstName": "Mary Ann", "lastName": "Lee", "email": "mal@example.com"}
            ]"#
            .to_owned(),
        )
        .unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0], RosterEntry::new(5, "John", "Doe"));
        assert_eq!(roster[1].email.as_deref(), Some("mal@example.com"));
    }

    #[test]
    fn test_bad_roster_points_at_line() {
        let err = parse_roster("roster.json", "[\n{\"id\": \"five\"}\n]".to_owned()).unwrap_err();
        assert_eq!(err.line_col().0, 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_roster(dir.path().join("nope.json")),
            Err(NotemarkError::Io { .. })
        ));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.json");
        std::fs::write(&path, r#"[{"id": 1, "firstName": "Ann", "lastName": "Lee"}]"#).unwrap();
        assert_eq!(load_roster(&path).unwrap()[0].id, 1);
    }
}
