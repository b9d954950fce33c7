use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

use super::ClientSnapshot;

/// Key under which the snapshot is stored.
pub const STATE_KEY: &str = "aiProductivityState";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Load-on-init, save-on-change, clear-on-demand storage for the client
/// snapshot. Every save overwrites the whole record.
pub trait StateStore: Send + Sync {
    fn load(&self) -> Result<Option<ClientSnapshot>, PersistError>;
    fn save(&self, snapshot: &ClientSnapshot) -> Result<(), PersistError>;
    fn clear(&self) -> Result<(), PersistError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedRecord {
    #[serde(flatten)]
    snapshot: ClientSnapshot,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
}

fn encode(snapshot: &ClientSnapshot) -> Result<String, PersistError> {
    let record = PersistedRecord { snapshot: snapshot.clone(), saved_at: Some(Utc::now()) };
    Ok(serde_json::to_string(&record)?)
}

fn decode(content: &str) -> Result<ClientSnapshot, PersistError> {
    let record: PersistedRecord = serde_json::from_str(content)?;
    Ok(record.snapshot)
}

/// Single serialized entry held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw serialized record, if any.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().clone()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<ClientSnapshot>, PersistError> {
        self.slot.lock().as_deref().map(decode).transpose()
    }

    fn save(&self, snapshot: &ClientSnapshot) -> Result<(), PersistError> {
        let content = encode(snapshot)?;
        *self.slot.lock() = Some(content);
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistError> {
        self.slot.lock().take();
        Ok(())
    }
}

/// JSON file named after [`STATE_KEY`] inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{STATE_KEY}.json"))
    }
}

impl StateStore for FileStore {
    fn load(&self) -> Result<Option<ClientSnapshot>, PersistError> {
        let path = self.path();
        match fs::read_to_string(&path) {
            Ok(content) => decode(&content).map(Some),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, snapshot: &ClientSnapshot) -> Result<(), PersistError> {
        let content = encode(snapshot)?;
        write_atomic(&self.dir, &self.path(), &content)
    }

    fn clear(&self) -> Result<(), PersistError> {
        match fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

fn write_atomic(dir: &Path, target: &Path, content: &str) -> Result<(), PersistError> {
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(target).map_err(|e| PersistError::Io(e.error))?;
    Ok(())
}
