//! Save hooks
//!
//! `JsonFileHook` writes each saved state to `<dir>/<base_name>.json`
//! wrapped in a small envelope recording when it was written.
//! `MemoryHook` keeps saved values in memory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use walkdir::WalkDir;

use super::accessible::SaveHook;
use crate::error::{EvolveError, Result};

/// Extension for saved state files.
const STATE_EXTENSION: &str = "json";

/// On-disk envelope around a saved state value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedState<V> {
    /// Base name the state was saved under
    pub name: String,
    /// When the state was written
    pub saved_at: DateTime<Utc>,
    pub state: V,
}

/// Persists states as pretty-printed JSON files in one directory
#[derive(Debug, Clone)]
pub struct JsonFileHook {
    dir: PathBuf,
}

impl JsonFileHook {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the states are written to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a state with this base name is written to
    pub fn path_for(&self, base_name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", base_name, STATE_EXTENSION))
    }

    /// Load a previously saved state
    pub fn load<V: DeserializeOwned>(&self, base_name: &str) -> Result<SavedState<V>> {
        let path = self.path_for(base_name);
        if !path.exists() {
            return Err(EvolveError::StateNotFound {
                name: base_name.to_string(),
            });
        }
        let content = fs::read_to_string(&path).map_err(|e| EvolveError::FileRead {
            path: path.clone(),
            source: e,
        })?;
        let saved: SavedState<V> = serde_json::from_str(&content)?;
        Ok(saved)
    }

    /// Base names of all states saved in the directory, sorted
    pub fn saved_names(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(std::io::Error::from)?;
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(STATE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn write<V: Serialize>(&self, base_name: &str, state: &V) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| EvolveError::DirectoryCreate {
                path: self.dir.clone(),
                source: e,
            })?;
        }

        let envelope = SavedState {
            name: base_name.to_string(),
            saved_at: Utc::now(),
            state,
        };
        let path = self.path_for(base_name);
        let content = serde_json::to_string_pretty(&envelope)?;

        fs::write(&path, content).map_err(|e| EvolveError::FileWrite { path, source: e })?;
        Ok(())
    }
}

impl<V: Serialize> SaveHook<V> for JsonFileHook {
    fn save(&self, base_name: &str, state: &V) -> Result<()> {
        self.write(base_name, state)?;
        debug!(base_name, dir = %self.dir.display(), "state written");
        Ok(())
    }
}

/// Keeps the last value saved under each base name
#[derive(Debug)]
pub struct MemoryHook<V> {
    saved: Mutex<HashMap<String, V>>,
}

impl<V: Clone> MemoryHook<V> {
    pub fn new() -> Self {
        Self {
            saved: Mutex::new(HashMap::new()),
        }
    }

    /// Last value saved under `base_name`
    pub fn get(&self, base_name: &str) -> Option<V> {
        self.saved
            .lock()
            .ok()
            .and_then(|saved| saved.get(base_name).cloned())
    }

    pub fn len(&self) -> usize {
        self.saved.lock().map(|saved| saved.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone> Default for MemoryHook<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send> SaveHook<V> for MemoryHook<V> {
    fn save(&self, base_name: &str, state: &V) -> Result<()> {
        let mut saved = self.saved.lock().map_err(|e| EvolveError::Persistence {
            name: base_name.to_string(),
            reason: e.to_string(),
        })?;
        saved.insert(base_name.to_string(), state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let hook = JsonFileHook::new(temp_dir.path().join("states"));

        hook.save("gen-3", &vec![1u32, 2, 3]).unwrap();

        let loaded: SavedState<Vec<u32>> = hook.load("gen-3").unwrap();
        assert_eq!(loaded.name, "gen-3");
        assert_eq!(loaded.state, vec![1, 2, 3]);
    }

    #[test]
    fn test_saved_names() {
        let temp_dir = TempDir::new().unwrap();
        let hook = JsonFileHook::new(temp_dir.path());

        hook.save("b", &1u8).unwrap();
        hook.save("a", &2u8).unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "x").unwrap();

        assert_eq!(hook.saved_names().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_load_missing() {
        let temp_dir = TempDir::new().unwrap();
        let hook = JsonFileHook::new(temp_dir.path());
        let err = hook.load::<u8>("nope").unwrap_err();
        assert_eq!(err.error_code(), "STATE_NOT_FOUND");
    }

    #[test]
    fn test_memory_hook() {
        let hook: MemoryHook<String> = MemoryHook::new();
        assert!(hook.is_empty());
        hook.save("x", &"first".to_string()).unwrap();
        hook.save("x", &"second".to_string()).unwrap();
        assert_eq!(hook.len(), 1);
        assert_eq!(hook.get("x").as_deref(), Some("second"));
    }
}
