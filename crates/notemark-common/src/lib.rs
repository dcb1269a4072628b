//! Shared application plumbing for notemark: errors, config files, roster
//! files and tracing setup.

pub mod config;
pub mod error;
pub mod roster;
pub mod telemetry;

pub use crate::config::{FileStore, Loader, NotemarkConfig, Saver};
pub use crate::error::{NotemarkError, ParseError, ParseErrorKind};
pub use crate::roster::{load_roster, parse_roster};
