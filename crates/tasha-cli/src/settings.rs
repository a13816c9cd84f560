//! User settings from `<config dir>/settings.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tasha_mechanics::config::DEFAULT_THRESHOLD;

use crate::store::CharacterStore;

const APP_NAME: &str = "tasha";
const SETTINGS_FILE: &str = "settings.toml";
const CHARACTERS_DIR: &str = "characters";

/// Overrides the platform config directory.
pub const CONFIG_DIR_ENV: &str = "TASHA_CONFIG_DIR";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub threshold: u32,
    pub characters_dir: Option<PathBuf>,
    #[serde(skip)]
    config_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            characters_dir: None,
            config_dir: PathBuf::from(".tasha"),
        }
    }
}

impl Settings {
    /// Read settings from the platform config directory. A missing file
    /// yields defaults; a malformed one is an error.
    pub fn load() -> Result<Self, String> {
        let config_dir = std::env::var_os(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .or_else(|| {
                directories::ProjectDirs::from("", "", APP_NAME)
                    .map(|dirs| dirs.config_dir().to_path_buf())
            })
            .unwrap_or_else(|| PathBuf::from(".tasha"));
        Self::load_from(&config_dir)
    }

    pub fn load_from(config_dir: &Path) -> Result<Self, String> {
        let path = config_dir.join(SETTINGS_FILE);
        let mut settings = if path.is_file() {
            let text = fs::read_to_string(&path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            Self::parse(&text).map_err(|e| format!("invalid settings in {}: {e}", path.display()))?
        } else {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            Self::default()
        };
        settings.config_dir = config_dir.to_path_buf();
        Ok(settings)
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Where characters are saved: the explicit directory, else the
    /// configured one, else `characters/` under the config directory.
    pub fn characters_dir(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.characters_dir.clone())
            .unwrap_or_else(|| self.config_dir.join(CHARACTERS_DIR))
    }

    pub fn store(&self, explicit: Option<&Path>) -> CharacterStore {
        CharacterStore::new(self.characters_dir(explicit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = Settings::parse("").unwrap();
        assert_eq!(settings.threshold, 70);
        assert_eq!(settings.characters_dir, None);
    }

    #[test]
    fn fields_override_defaults() {
        let settings = Settings::parse("threshold = 80\ncharacters_dir = \"/srv/party\"\n").unwrap();
        assert_eq!(settings.threshold, 80);
        assert_eq!(settings.characters_dir, Some(PathBuf::from("/srv/party")));
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(Settings::parse("treshold = 80").is_err());
        assert!(Settings::parse("threshold = \"high\"").is_err());
    }

    #[test]
    fn characters_dir_precedence() {
        let mut settings = Settings::load_from(Path::new("/nonexistent/tasha")).unwrap();
        assert_eq!(
            settings.characters_dir(None),
            PathBuf::from("/nonexistent/tasha/characters")
        );

        settings.characters_dir = Some(PathBuf::from("/srv/party"));
        assert_eq!(settings.characters_dir(None), PathBuf::from("/srv/party"));
        assert_eq!(
            settings.characters_dir(Some(Path::new("here"))),
            PathBuf::from("here")
        );
    }

    #[test]
    fn load_from_reads_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path();
        fs::write(dir.join(SETTINGS_FILE), "threshold = 75\n").unwrap();
        let settings = Settings::load_from(dir).unwrap();
        assert_eq!(settings.threshold, 75);
        assert_eq!(settings.characters_dir(None), dir.join(CHARACTERS_DIR));

        fs::write(dir.join(SETTINGS_FILE), "threshold = [").unwrap();
        assert!(Settings::load_from(dir).is_err());
    }
}
