use notemark_editor_core::EngineConfig;
use serde::{Deserialize, Serialize};

use std::path::Path;
use std::path::PathBuf;

use crate::error::{NotemarkError, ParseError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotemarkConfig {
    /// Roster file (JSON array of entries). Relative paths are resolved
    /// against the directory of the config file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roster: Option<PathBuf>,
    /// Engine tuning.
    pub engine: EngineConfig,
}

impl NotemarkConfig {
    /// Loads the configuration from the provided loader.
    pub fn load(loader: &impl Loader) -> Result<Self, NotemarkError> {
        loader.load()
    }

    /// Saves the configuration using the provided saver.
    pub fn save(&self, saver: &impl Saver) -> Result<(), NotemarkError> {
        saver.save(self)
    }
}

/// The trait for loading configuration data.
pub trait Loader {
    fn load(&self) -> Result<NotemarkConfig, NotemarkError>;
}

/// The trait for saving configuration data.
pub trait Saver {
    fn save(&self, config: &NotemarkConfig) -> Result<(), NotemarkError>;
}

/// An implementation of [`Loader`] and [`Saver`] that reads and writes a configuration file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a new [`FileStore`] with the given path.
    ///
    /// [`NotemarkConfig`] data will be serialized and deserialized using the
    /// file extension, `.json` or `.toml`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> Result<Format, NotemarkError> {
        match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            _ => Err(NotemarkError::UnsupportedFormat {
                path: self.path.clone(),
            }),
        }
    }
}

enum Format {
    Json,
    Toml,
}

impl Loader for FileStore {
    /// A missing file yields the defaults.
    fn load(&self) -> Result<NotemarkConfig, NotemarkError> {
        let format = self.format()?;
        let source = match std::fs::read_to_string(&self.path) {
            Ok(source) => source,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    target: "notemark::config",
                    path = %self.path.display(),
                    "no config file, using defaults"
                );
                return Ok(NotemarkConfig::default());
            }
            Err(err) => return Err(NotemarkError::io(&self.path, err)),
        };

        let name = self.path.display().to_string();
        let mut config: NotemarkConfig = match format {
            Format::Json => serde_json::from_str(&source)
                .map_err(|err| ParseError::json(err, name, source.clone()))?,
            Format::Toml => toml::from_str(&source)
                .map_err(|err| ParseError::toml(err, name, source.clone()))?,
        };

        if let (Some(roster), Some(dir)) = (&config.roster, self.path.parent()) {
            if roster.is_relative() {
                config.roster = Some(dir.join(roster));
            }
        }
        tracing::debug!(target: "notemark::config", path = %self.path.display(), "loaded config");
        Ok(config)
    }
}

impl Saver for FileStore {
    fn save(&self, config: &NotemarkConfig) -> Result<(), NotemarkError> {
        let contents = match self.format()? {
            Format::Json => serde_json::to_string_pretty(config)
                .map_err(|err| NotemarkError::Serialize(err.to_string()))?,
            Format::Toml => toml::to_string_pretty(config)
                .map_err(|err| NotemarkError::Serialize(err.to_string()))?,
        };
        std::fs::write(&self.path, contents).map_err(|err| NotemarkError::io(&self.path, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notemark_editor_core::MentionInsertStyle;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent.toml"));
        assert_eq!(NotemarkConfig::load(&store).unwrap(), NotemarkConfig::default());
    }

    #[test]
    fn test_toml_partial_engine_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notemark.toml");
        std::fs::write(
            &path,
            "roster = \"people.json\"\n\n[engine]\nsuggestion_min_query = 1\nmention_insert_style = \"joined\"\n",
        )
        .unwrap();

        let config = NotemarkConfig::load(&FileStore::new(&path)).unwrap();
        assert_eq!(config.roster, Some(dir.path().join("people.json")));
        assert_eq!(config.engine.suggestion_min_query, 1);
        assert_eq!(config.engine.suggestion_limit, 5);
        assert_eq!(config.engine.mention_insert_style, MentionInsertStyle::Joined);
    }

    #[test]
    fn test_save_then_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("notemark.json"));
        let mut config = NotemarkConfig::default();
        config.engine.class_prefix = "tag".to_owned();
        config.save(&store).unwrap();
        assert_eq!(NotemarkConfig::load(&store).unwrap(), config);
    }

    #[test]
    fn test_bad_extension_and_bad_contents() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = FileStore::new(dir.path().join("notemark.yaml"));
        assert!(matches!(
            NotemarkConfig::load(&yaml),
            Err(NotemarkError::UnsupportedFormat { .. })
        ));

        let path = dir.path().join("notemark.toml");
        std::fs::write(&path, "[engine]\nsuggestion_limit = \"many\"\n").unwrap();
        assert!(matches!(
            NotemarkConfig::load(&FileStore::new(&path)),
            Err(NotemarkError::Parse(_))
        ));
    }
}
