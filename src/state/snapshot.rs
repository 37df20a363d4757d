//! Persisted progress snapshot
//!
//! A single named record holding `{ step, data, ui }` as JSON. Storage
//! failures never reach the user: the form keeps working without autosave.
//! A record that cannot be parsed is treated exactly like a missing one.

use crate::state::{FormData, Step};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by a snapshot store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Key-value slot holding the serialized snapshot
#[cfg_attr(test, mockall::automock)]
pub trait SnapshotStore {
    /// Read the stored record, `None` when nothing was saved
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Overwrite the stored record
    fn write(&mut self, contents: &str) -> Result<(), StorageError>;

    /// Delete the stored record; deleting a missing record succeeds
    fn remove(&mut self) -> Result<(), StorageError>;
}

/// Snapshot kept in `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn read(&self) -> Result<Option<String>, StorageError> {
        if self.path.is_dir() {
            return Err(StorageError::Unavailable);
        }
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, contents: &str) -> Result<(), StorageError> {
        if self.path.is_dir() {
            return Err(StorageError::Unavailable);
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, contents)?;
        Ok(())
    }

    fn remove(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Store that lives only as long as the process; used when autosave is off
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    contents: Option<String>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.contents.clone())
    }

    fn write(&mut self, contents: &str) -> Result<(), StorageError> {
        self.contents = Some(contents.to_string());
        Ok(())
    }

    fn remove(&mut self) -> Result<(), StorageError> {
        self.contents = None;
        Ok(())
    }
}

/// Display preferences, persisted with the form but never reset by submission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiPreferences {
    #[serde(default)]
    pub contrast: bool,
}

/// The exact shape written to storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    pub step: Step,
    pub data: FormData,
    #[serde(default)]
    pub ui: UiPreferences,
}

impl PersistedSnapshot {
    /// Parse a stored record, normalizing what the form relies on
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let mut snapshot: PersistedSnapshot = serde_json::from_str(contents)?;
        snapshot.data.dedupe_allergies();
        Ok(snapshot)
    }
}

/// Load the saved snapshot; any failure means a cold start
pub fn restore(store: &dyn SnapshotStore) -> Option<PersistedSnapshot> {
    let contents = match store.read() {
        Ok(Some(contents)) => contents,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!("Could not read saved progress: {err}");
            return None;
        }
    };
    match PersistedSnapshot::parse(&contents) {
        Ok(snapshot) => {
            tracing::debug!("Restored saved progress at step {}", snapshot.step.number());
            Some(snapshot)
        }
        Err(err) => {
            tracing::debug!("Ignoring malformed saved progress: {err}");
            None
        }
    }
}

/// Overwrite the saved snapshot. Returns whether the write succeeded; failures
/// are logged and otherwise ignored.
pub fn persist(store: &mut dyn SnapshotStore, snapshot: &PersistedSnapshot) -> bool {
    let contents = match serde_json::to_string(snapshot) {
        Ok(contents) => contents,
        Err(err) => {
            tracing::warn!("Could not serialize progress: {err}");
            return false;
        }
    };
    match store.write(&contents) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!("Autosave failed, continuing without it: {err}");
            false
        }
    }
}

/// Delete the saved snapshot, ignoring failures
pub fn clear(store: &mut dyn SnapshotStore) -> bool {
    match store.remove() {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!("Could not clear saved progress: {err}");
            false
        }
    }
}
