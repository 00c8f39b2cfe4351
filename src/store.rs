//! Persisted level/score progress
//!
//! The store owns the progress record and writes it back through a
//! [`StorageBackend`] after every mutation. Writes are synchronous and
//! fire-and-forget: a failed write is logged and play continues.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Key-value persistence used by the store and settings
pub trait StorageBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory backend. Clones share the same map, so a caller can keep a
/// handle and inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Rc<RefCell<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    items: HashMap<String, String>,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without counting it as a write
    pub fn with_item(self, key: &str, value: &str) -> Self {
        self.inner
            .borrow_mut()
            .items
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Number of writes performed so far
    pub fn write_count(&self) -> usize {
        self.inner.borrow().writes
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.borrow().items.get(key).cloned()
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();
        inner.items.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$XDG_CONFIG_HOME/gear-chain`, falling back to `~/.config/gear-chain`
    pub fn in_config_dir() -> Self {
        let base = match std::env::var("XDG_CONFIG_HOME") {
            Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
            _ => std::env::var("HOME")
                .map(|h| PathBuf::from(h).join(".config"))
                .unwrap_or_else(|_| PathBuf::from(".")),
        };
        Self::new(base.join("gear-chain"))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// Level and score carried between sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedProgress {
    /// Current level, starting at 1
    pub level: u32,
    pub score: u64,
}

impl Default for SavedProgress {
    fn default() -> Self {
        Self { level: 1, score: 0 }
    }
}

impl SavedProgress {
    /// Parse saved progress, falling back to defaults on anything unusable
    pub fn parse(json: &str) -> Self {
        match serde_json::from_str::<SavedProgress>(json) {
            Ok(progress) if progress.level >= 1 => progress,
            Ok(progress) => {
                log::warn!("Saved progress has level {}, using defaults", progress.level);
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to parse saved game state: {}", e);
                Self::default()
            }
        }
    }
}

/// Owner of the persisted progress record
pub struct GameStateStore {
    progress: SavedProgress,
    backend: Box<dyn StorageBackend>,
}

impl std::fmt::Debug for GameStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameStateStore")
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}

impl GameStateStore {
    /// Storage key for the progress record
    pub const STORAGE_KEY: &'static str = "gameState";

    /// Read progress from `backend`, defaulting when absent or unreadable
    pub fn load(backend: impl StorageBackend + 'static) -> Self {
        let progress = match backend.read(Self::STORAGE_KEY) {
            Ok(Some(json)) => {
                let progress = SavedProgress::parse(&json);
                log::info!(
                    "Loaded progress: level {}, score {}",
                    progress.level,
                    progress.score
                );
                progress
            }
            Ok(None) => {
                log::info!("No saved progress found, starting fresh");
                SavedProgress::default()
            }
            Err(e) => {
                log::warn!("Failed to read saved progress: {}", e);
                SavedProgress::default()
            }
        };

        Self {
            progress,
            backend: Box::new(backend),
        }
    }

    pub fn progress(&self) -> SavedProgress {
        self.progress
    }

    pub fn level(&self) -> u32 {
        self.progress.level
    }

    pub fn score(&self) -> u64 {
        self.progress.score
    }

    pub fn increment_level(&mut self) {
        self.progress.level = self.progress.level.saturating_add(1);
        self.persist();
    }

    pub fn add_score(&mut self, points: u64) {
        self.progress.score = self.progress.score.saturating_add(points);
        self.persist();
    }

    /// Back to level 1 with no score
    pub fn reset(&mut self) {
        self.progress = SavedProgress::default();
        self.persist();
    }

    /// Write the current record. Returns false if the write failed.
    pub fn persist(&mut self) -> bool {
        let result = serde_json::to_string(&self.progress)
            .map_err(StorageError::from)
            .and_then(|json| self.backend.write(Self::STORAGE_KEY, &json));

        match result {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Progress not persisted: {}", e);
                false
            }
        }
    }
}
