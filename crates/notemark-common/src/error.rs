//! Error types for notemark applications.

use miette::{Diagnostic, NamedSource, SourceOffset, SourceSpan};
use notemark_editor_core::{SubmitError, SurfaceError};
use std::path::PathBuf;

/// Main error type for notemark operations
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum NotemarkError {
    /// IO error
    #[error("could not access {}", .path.display())]
    #[diagnostic(code(notemark::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Parse error with source location
    #[error(transparent)]
    #[diagnostic_source]
    Parse(#[from] ParseError),

    /// File extension we don't know how to read or write
    #[error("unsupported file format: {}", .path.display())]
    #[diagnostic(
        code(notemark::config::format),
        help("use a .toml or .json file")
    )]
    UnsupportedFormat { path: PathBuf },

    /// Serializing configuration failed
    #[error("could not serialize configuration: {0}")]
    #[diagnostic(code(notemark::config::serialize))]
    Serialize(String),

    /// The surface host rejected a render
    #[error(transparent)]
    #[diagnostic(code(notemark::surface))]
    Surface(#[from] SurfaceError),

    /// The notes API refused or failed a submission
    #[error(transparent)]
    #[diagnostic(code(notemark::submit))]
    Submit(#[from] SubmitError),
}

impl NotemarkError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NotemarkError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Parse error with source code location information
#[derive(thiserror::Error, Debug, Diagnostic)]
#[error("parse error: {}", self.kind)]
#[diagnostic(code(notemark::parse))]
pub struct ParseError {
    #[diagnostic_source]
    kind: ParseErrorKind,
    #[source_code]
    src: NamedSource<String>,
    #[label("here")]
    err_location: SourceSpan,
    #[help]
    advice: Option<String>,
}

impl ParseError {
    /// JSON error located in `source`. serde_json reports 1-based line/column.
    pub fn json(err: serde_json::Error, name: impl AsRef<str>, source: String) -> Self {
        let offset = if err.line() == 0 {
            SourceOffset::from(source.len())
        } else {
            SourceOffset::from_location(&source, err.line(), err.column())
        };
        Self {
            kind: ParseErrorKind::Json(err),
            src: NamedSource::new(name, source),
            err_location: SourceSpan::new(offset, 0),
            advice: None,
        }
    }

    /// TOML error located in `source`, using the byte span toml reports.
    pub fn toml(err: toml::de::Error, name: impl AsRef<str>, source: String) -> Self {
        let span = err
            .span()
            .map(|range| SourceSpan::from(range.start..range.end))
            .unwrap_or_else(|| SourceSpan::new(SourceOffset::from(0), 0));
        Self {
            kind: ParseErrorKind::Toml(err),
            src: NamedSource::new(name, source),
            err_location: span,
            advice: None,
        }
    }

    pub fn with_advice(mut self, advice: impl Into<String>) -> Self {
        self.advice = Some(advice.into());
        self
    }

    /// Byte offset of the reported location.
    pub fn offset(&self) -> usize {
        self.err_location.offset()
    }

    /// 1-based line and column of the reported location.
    pub fn line_col(&self) -> (usize, usize) {
        offset_to_line_col(self.err_location.offset(), self.src.inner())
    }
}

#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

fn offset_to_line_col(offset: usize, src: &str) -> (usize, usize) {
    let mut line_start = 0usize;

    for (i, line) in src.split_inclusive('\n').enumerate() {
        let line_end = line_start + line.len();
        if offset < line_end {
            let col = line
                .char_indices()
                .take_while(|(byte_idx, _)| line_start + byte_idx < offset)
                .count();
            return (i + 1, col + 1);
        }
        line_start = line_end;
    }
    (src.lines().count().max(1), 1)
}
