use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::credentials::ConfigError;

/// Optional settings file. Everything here has a default, so a missing file
/// just means defaults; a malformed file is a fatal configuration error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Tag names that unconditionally protect a library entry from deletion.
    #[serde(default = "default_exclude_tags")]
    pub exclude_tags: Vec<String>,

    /// Title of the media server's movie library section.
    #[serde(default = "default_plex_library")]
    pub plex_library: String,

    /// Age threshold in days, overridable per run via --days.
    #[serde(default = "default_days")]
    pub default_days: u32,
}

fn default_exclude_tags() -> Vec<String> {
    vec!["keep".to_string(), "donotdelete".to_string()]
}

fn default_plex_library() -> String {
    "Films".to_string()
}

fn default_days() -> u32 {
    3
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            exclude_tags: default_exclude_tags(),
            plex_library: default_plex_library(),
            default_days: default_days(),
        }
    }
}

impl Settings {
    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::UnreadableSettings {
                path: path.display().to_string(),
                source,
            })?;
        toml::from_str(&content).map_err(|source| ConfigError::InvalidSettings {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_yields_defaults() {
        let settings = Settings::load_or_default(Path::new("/nonexistent/watchsweep.toml")).unwrap();
        assert_eq!(settings.exclude_tags, vec!["keep", "donotdelete"]);
        assert_eq!(settings.plex_library, "Films");
        assert_eq!(settings.default_days, 3);
    }

    #[test]
    fn test_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let settings = Settings {
            exclude_tags: vec!["archive".to_string()],
            plex_library: "Movies".to_string(),
            default_days: 7,
        };

        settings.save_to_file(file.path()).unwrap();
        let loaded = Settings::load_or_default(file.path()).unwrap();
        assert_eq!(loaded.exclude_tags, vec!["archive"]);
        assert_eq!(loaded.plex_library, "Movies");
        assert_eq!(loaded.default_days, 7);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "default_days = 14\n").unwrap();

        let loaded = Settings::load_or_default(file.path()).unwrap();
        assert_eq!(loaded.default_days, 14);
        assert_eq!(loaded.exclude_tags, vec!["keep", "donotdelete"]);
    }

    #[test]
    fn test_malformed_file_is_fatal() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "exclude_tags = 3\n").unwrap();

        let err = Settings::load_or_default(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSettings { .. }));
    }
}
