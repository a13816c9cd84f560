//! Saved characters, one TOML file each.

use std::fs;
use std::path::{Path, PathBuf};

use tasha_mechanics::CharacterState;

pub struct CharacterStore {
    dir: PathBuf,
}

impl CharacterStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// File name for a character: spaces become underscores.
    pub fn file_name(name: &str) -> String {
        format!("{}.toml", name.trim().replace([' ', '/', '\\'], "_"))
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(Self::file_name(name))
    }

    /// Write the record, creating the directory if needed.
    pub fn save(&self, state: &CharacterState) -> Result<PathBuf, String> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| format!("cannot create {}: {e}", self.dir.display()))?;
        let content = toml::to_string_pretty(state)
            .map_err(|e| format!("cannot serialize \"{}\": {e}", state.name))?;
        let path = self.path_for(&state.name);
        fs::write(&path, content).map_err(|e| format!("cannot write {}: {e}", path.display()))?;
        tracing::debug!(path = %path.display(), "character saved");
        Ok(path)
    }

    /// Whether a character with this name (after file-name mapping) is saved.
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    pub fn load(&self, name: &str) -> Result<CharacterState, String> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(format!("character not found: \"{name}\""));
        }
        read(&path)
    }

    pub fn remove(&self, name: &str) -> Result<(), String> {
        let path = self.path_for(name);
        fs::remove_file(&path).map_err(|e| format!("cannot remove {}: {e}", path.display()))
    }

    /// Every readable character, sorted by file name. Unreadable files are
    /// skipped with a warning.
    pub fn list(&self) -> Result<Vec<CharacterState>, String> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.dir)
            .map_err(|e| format!("cannot read {}: {e}", self.dir.display()))?;
        let mut paths: Vec<_> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();

        let mut characters = Vec::new();
        for path in paths {
            match read(&path) {
                Ok(state) => characters.push(state),
                Err(e) => tracing::warn!("skipping {e}"),
            }
        }
        Ok(characters)
    }
}

fn read(path: &Path) -> Result<CharacterState, String> {
    let text =
        fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    toml::from_str(&text).map_err(|e| format!("{}: {e}", path.display()))
}
