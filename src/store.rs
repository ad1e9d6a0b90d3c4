//! Persistence of per-day game snapshots.
//!
//! Keys look like `wordleGameState_2024-3-7_classic_len5` or
//! `wordleGameState_2024-3-7_dynamic`. Values are flat JSON [`GameState`]
//! records. The backing key-value store is pluggable.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use log::warn;

use crate::error::StoreError;
use crate::game_state::GameState;
use crate::{debug_log, info_log};

pub const KEY_NAMESPACE: &str = "wordleGameState";

/// String key-value storage, the moral equivalent of browser local storage.
pub trait KeyValueStorage {
    /// # Errors
    /// Backend read failure. A missing key is `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// # Errors
    /// Backend write failure.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// # Errors
    /// Backend failure. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// # Errors
    /// Backend listing failure.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Volatile storage; used for `--no-save` and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// One `<key>.json` file per entry inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    /// Storage under the platform data directory.
    ///
    /// # Errors
    /// Fails if the directory cannot be created.
    pub fn new() -> Result<Self, StoreError> {
        Self::with_base_dir(default_save_dir())
    }

    /// # Errors
    /// Fails if the directory cannot be created.
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&base_dir).map_err(|source| StoreError::Io {
            key: base_dir.display().to_string(),
            source,
        })?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }
}

fn io_err(key: &str) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        key: key.to_string(),
        source,
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.file_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(key)(e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.file_path(key);
        let tmp_path = path.with_extension("tmp");

        let mut file = fs::File::create(&tmp_path).map_err(io_err(key))?;
        file.write_all(value.as_bytes()).map_err(io_err(key))?;
        file.sync_all().map_err(io_err(key))?;

        fs::rename(&tmp_path, &path).map_err(io_err(key))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.file_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(key)(e)),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = fs::read_dir(&self.base_dir).map_err(io_err(""))?;
        let mut keys = Vec::new();
        for entry in entries {
            let path = entry.map_err(io_err(""))?.path();
            if path.extension().and_then(|x| x.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[must_use]
pub fn default_save_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("turkce-wordle")
        .join("saves")
}

/// Which save a session reads and writes within a day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveSlot {
    Classic { length: usize },
    /// Dynamic games share one slot since their length varies per session.
    Dynamic,
}

impl SaveSlot {
    fn suffix(self) -> String {
        match self {
            Self::Classic { length } => format!("classic_len{length}"),
            Self::Dynamic => "dynamic".to_string(),
        }
    }
}

/// Save/load/purge of [`GameState`] snapshots on top of a [`KeyValueStorage`].
#[derive(Debug, Clone)]
pub struct GameStore<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> GameStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub fn key_for(date: &str, slot: SaveSlot) -> String {
        format!("{KEY_NAMESPACE}_{date}_{}", slot.suffix())
    }

    /// Persist `state` under its own date.
    ///
    /// # Errors
    /// Serialization or storage failure; callers surface it as a warning.
    pub fn save(&mut self, state: &GameState, slot: SaveSlot) -> Result<(), StoreError> {
        let key = Self::key_for(&state.date, slot);
        let json = serde_json::to_string(state)?;
        self.storage.set(&key, &json)?;
        debug_log!("Game state saved: {}", key);
        Ok(())
    }

    /// Read the snapshot for `date`/`slot`.
    ///
    /// Anything unusable (missing, unreadable, malformed, old schema,
    /// inconsistent) comes back as `None`.
    pub fn load(&self, date: &str, slot: SaveSlot) -> Option<GameState> {
        let key = Self::key_for(date, slot);
        let content = match self.storage.get(&key) {
            Ok(Some(content)) => content,
            Ok(None) => return None,
            Err(e) => {
                warn!("Could not read saved game {key}: {e}");
                return None;
            }
        };

        let state: GameState = match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(e) => {
                warn!("Discarding unparsable saved game {key}: {e}");
                return None;
            }
        };

        if state.needs_reset() {
            info_log!(
                "Discarding saved game {} with schema version {}",
                key,
                state.schema_version
            );
            return None;
        }
        if state.date != date || !state.is_consistent() {
            warn!("Discarding inconsistent saved game {key}");
            return None;
        }
        Some(state)
    }

    /// Remove every namespaced key whose date segment is not `today`.
    ///
    /// Returns how many entries were removed. Failures are logged and the
    /// rest of the sweep continues.
    pub fn purge_stale(&mut self, today: &str) -> usize {
        let keys = match self.storage.keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Could not list saved games: {e}");
                return 0;
            }
        };

        let namespace = format!("{KEY_NAMESPACE}_");
        let todays = format!("{KEY_NAMESPACE}_{today}_");
        let mut removed = 0;
        for key in keys
            .iter()
            .filter(|k| k.starts_with(&namespace) && !k.starts_with(&todays))
        {
            match self.storage.remove(key) {
                Ok(()) => removed += 1,
                Err(e) => warn!("Could not remove stale save {key}: {e}"),
            }
        }
        if removed > 0 {
            info_log!("Purged {} stale saved games", removed);
        }
        removed
    }
}
