// ============================================
// src/store.rs
// Key-value stores for persisted game data
// ============================================

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::debug;

use crate::error::StoreError;

/// String values under string keys. Single writer, synchronous.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// In-memory store. Can simulate an unavailable or full backend.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    available: bool,
    /// Maximum accepted value length in bytes.
    quota: Option<usize>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            available: true,
            quota: None,
            writes: 0,
        }
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn set_quota(&mut self, quota: Option<usize>) {
        self.quota = quota;
    }

    /// Number of successful `set` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if !self.available {
            return Err(StoreError::Unavailable);
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if !self.available {
            return Err(StoreError::Unavailable);
        }
        if self.quota.is_some_and(|quota| value.len() > quota) {
            return Err(StoreError::QuotaExceeded(key.to_string()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if !self.available {
            return Err(StoreError::Unavailable);
        }
        self.entries.remove(key);
        Ok(())
    }
}

/// One file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// MARK: Store in the OS data directory
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(default_data_dir())
    }

    /// Store rooted at `dir`, created if missing.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match fs::write(&path, value) {
            Ok(()) => {
                debug!("wrote {} bytes to {}", value.len(), path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::StorageFull => {
                Err(StoreError::QuotaExceeded(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("nl", "PimPamPet", "pimpampet")
}

/// Platform data directory, or the working directory when there is none.
pub fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Platform config directory, or the working directory when there is none.
pub fn default_config_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_values() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn memory_store_simulates_failures() {
        let mut store = MemoryStore::new();
        store.set_quota(Some(3));
        assert!(matches!(
            store.set("k", "long value"),
            Err(StoreError::QuotaExceeded(_))
        ));
        store.set_available(false);
        assert!(matches!(store.get("k"), Err(StoreError::Unavailable)));
    }

    #[test]
    fn file_store_reads_back_what_it_wrote() {
        let dir = std::env::temp_dir().join(format!("pimpampet-store-{}", std::process::id()));
        let mut store = FileStore::open(&dir).unwrap();

        assert_eq!(store.get("dutch-word-game-questions").unwrap(), None);
        store.set("dutch-word-game-questions", "[\"Q1\"]").unwrap();
        assert_eq!(
            store.get("dutch-word-game-questions").unwrap().as_deref(),
            Some("[\"Q1\"]")
        );
        assert!(dir.join("dutch-word-game-questions.json").exists());

        store.remove("dutch-word-game-questions").unwrap();
        store.remove("dutch-word-game-questions").unwrap();
        assert_eq!(store.get("dutch-word-game-questions").unwrap(), None);

        let _ = fs::remove_dir_all(&dir);
    }
}
