//! Session persistence
//!
//! Two values survive across sessions: the last track index and the volume. Both are
//! stored as decimal strings under fixed keys so any string key-value store can back
//! them.

use crate::controller::clamp_volume;
use crate::types::SessionSnapshot;
use cadence_core::{CadenceError, SessionStore};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Key holding the last selected track index
pub const LAST_TRACK_INDEX_KEY: &str = "lastTrackIndex";

/// Key holding the last volume level
pub const VOLUME_KEY: &str = "volume";

/// Reads the snapshot once and writes it back whenever it changes
pub struct SessionPersistence<S: SessionStore> {
    store: S,
    last_written: Option<(usize, f32)>,
}

impl<S: SessionStore> SessionPersistence<S> {
    /// Wrap a store
    pub fn new(store: S) -> Self {
        Self {
            store,
            last_written: None,
        }
    }

    /// Read the persisted snapshot
    ///
    /// Missing, unreadable, or malformed values come back as `None`.
    pub fn load(&self) -> SessionSnapshot {
        let last_track_index = self
            .read(LAST_TRACK_INDEX_KEY)
            .and_then(|raw| raw.trim().parse::<usize>().ok());
        let volume = self
            .read(VOLUME_KEY)
            .and_then(|raw| raw.trim().parse::<f32>().ok())
            .and_then(clamp_volume);

        SessionSnapshot {
            last_track_index,
            volume,
        }
    }

    /// Write both keys if either value changed since the last write
    ///
    /// Failures are logged and otherwise ignored.
    pub fn save(&mut self, snapshot: &SessionSnapshot) {
        let (Some(index), Some(volume)) = (snapshot.last_track_index, snapshot.volume) else {
            return;
        };
        if self.last_written == Some((index, volume)) {
            return;
        }

        let index_written = self.write(LAST_TRACK_INDEX_KEY, &index.to_string());
        let volume_written = self.write(VOLUME_KEY, &volume.to_string());
        if index_written && volume_written {
            self.last_written = Some((index, volume));
        }
    }

    /// Borrow the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to read persisted session value");
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) -> bool {
        match self.store.set(key, value) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "Failed to persist session value");
                false
            }
        }
    }
}

/// In-memory store, lost when dropped
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    values: HashMap<String, String>,
}

impl MemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> cadence_core::Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> cadence_core::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object on disk
///
/// The whole file is rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct JsonFileSessionStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileSessionStore {
    /// Open the store at `path`
    ///
    /// A missing file starts empty.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or is not a JSON object
    /// of strings
    pub fn open(path: impl AsRef<Path>) -> cadence_core::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Session file not found, starting empty");
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for JsonFileSessionStore {
    fn get(&self, key: &str) -> cadence_core::Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> cadence_core::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        let contents = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, contents).map_err(|e| {
            CadenceError::storage(format!("{}: {e}", self.path.display()))
        })
    }
}
