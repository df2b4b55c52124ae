//! Save/load of the whole game state into a named slot.
//!
//! A save is a JSON envelope around the complete [`GameState`]. Load is a
//! full replacement; there is no partial or merge path. Storage sits behind
//! the [`SaveStore`] trait so the session does not care whether slots live
//! on disk or in memory.

use crate::world::GameState;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Default slot name.
pub const DEFAULT_SLOT: &str = "miniRpgFullSave";

/// Current save format version.
pub const SAVE_VERSION: u32 = 1;

// ============================================================================
// Save envelope
// ============================================================================

/// A saved game with everything needed to resume play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    /// Save format version for compatibility checking.
    pub version: u32,

    /// Seconds since the Unix epoch.
    pub saved_at: u64,

    /// Quick-look summary.
    pub metadata: SaveMetadata,

    /// The complete game state.
    pub state: GameState,
}

/// Summary readable without restoring the state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveMetadata {
    pub hp: i32,
    pub gold: u32,
    pub level: u32,
    pub quests_completed: usize,
    pub mode: String,
}

impl SavedGame {
    pub fn new(state: GameState) -> Self {
        let metadata = SaveMetadata {
            hp: state.player.hp,
            gold: state.player.gold,
            level: state.player.level,
            quests_completed: state.quests_completed(),
            mode: state.mode.name().to_string(),
        };

        Self {
            version: SAVE_VERSION,
            saved_at: now_secs(),
            metadata,
            state,
        }
    }

    /// Serialize to the stored text form.
    pub fn encode(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse stored text, rejecting other format versions.
    pub fn decode(text: &str) -> Result<Self, PersistError> {
        let saved: Self = serde_json::from_str(text)?;
        check_version(saved.version)?;
        Ok(saved)
    }

    /// Read only the metadata from stored text.
    pub fn peek_metadata(text: &str) -> Result<SaveMetadata, PersistError> {
        #[derive(Deserialize)]
        struct Partial {
            version: u32,
            metadata: SaveMetadata,
        }

        let partial: Partial = serde_json::from_str(text)?;
        check_version(partial.version)?;
        Ok(partial.metadata)
    }
}

fn check_version(found: u32) -> Result<(), PersistError> {
    if found != SAVE_VERSION {
        return Err(PersistError::VersionMismatch {
            expected: SAVE_VERSION,
            found,
        });
    }
    Ok(())
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

// ============================================================================
// Stores
// ============================================================================

/// A key-value store of text values.
#[async_trait]
pub trait SaveStore: Send + Sync {
    /// The value under `slot`, or `None` if nothing was saved there.
    async fn get(&self, slot: &str) -> Result<Option<String>, PersistError>;

    async fn put(&self, slot: &str, value: &str) -> Result<(), PersistError>;

    /// Delete `slot`. Removing an empty slot is not an error.
    async fn remove(&self, slot: &str) -> Result<(), PersistError>;
}

/// Stores each slot as `<dir>/<slot>.json`.
#[derive(Debug, Clone)]
pub struct FileSaveStore {
    dir: PathBuf,
}

impl FileSaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `slot`. Non-alphanumeric characters become underscores.
    pub fn slot_path(&self, slot: &str) -> PathBuf {
        let sanitized = slot
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
            .collect::<String>();
        self.dir.join(format!("{sanitized}.json"))
    }
}

#[async_trait]
impl SaveStore for FileSaveStore {
    async fn get(&self, slot: &str) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.slot_path(slot)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, slot: &str, value: &str) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir).await?;
        fs::write(self.slot_path(slot), value).await?;
        Ok(())
    }

    async fn remove(&self, slot: &str) -> Result<(), PersistError> {
        match fs::remove_file(self.slot_path(slot)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySaveStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySaveStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SaveStore for MemorySaveStore {
    async fn get(&self, slot: &str) -> Result<Option<String>, PersistError> {
        Ok(self.slots.lock().await.get(slot).cloned())
    }

    async fn put(&self, slot: &str, value: &str) -> Result<(), PersistError> {
        self.slots
            .lock()
            .await
            .insert(slot.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, slot: &str) -> Result<(), PersistError> {
        self.slots.lock().await.remove(slot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::EnemyId;

    #[test]
    fn test_saved_game_creation() {
        let mut state = GameState::new();
        state.player.gold = 9;
        let saved = SavedGame::new(state);

        assert_eq!(saved.version, SAVE_VERSION);
        assert_eq!(saved.metadata.gold, 9);
        assert_eq!(saved.metadata.hp, 100);
        assert_eq!(saved.metadata.mode, "Exploring");
    }

    #[test]
    fn test_encode_decode() {
        let mut state = GameState::new();
        state.player.add_item("Healing Herb");
        state.start_battle(EnemyId::new("g1"));
        let saved = SavedGame::new(state.clone());

        let decoded = SavedGame::decode(&saved.encode().unwrap()).unwrap();
        assert_eq!(decoded.state, state);
    }

    #[test]
    fn test_decode_rejects_other_version() {
        let mut saved = SavedGame::new(GameState::new());
        saved.version = 99;
        let text = saved.encode().unwrap();

        assert!(matches!(
            SavedGame::decode(&text),
            Err(PersistError::VersionMismatch {
                expected: 1,
                found: 99
            })
        ));
    }

    #[test]
    fn test_decode_corrupt() {
        assert!(matches!(
            SavedGame::decode("{\"version\": 1, \"state\": 4"),
            Err(PersistError::Json(_))
        ));
    }

    #[test]
    fn test_peek_metadata() {
        let mut state = GameState::new();
        state.player.level = 3;
        let text = SavedGame::new(state).encode().unwrap();
        let metadata = SavedGame::peek_metadata(&text).unwrap();
        assert_eq!(metadata.level, 3);
    }

    #[test]
    fn test_slot_path_sanitized() {
        let store = FileSaveStore::new("/saves");
        let path = store.slot_path("my save/../x");
        assert!(path.to_string_lossy().ends_with("my_save____x.json"));
        assert!(path.starts_with("/saves"));
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemorySaveStore::new();
        assert_eq!(store.get("slot").await.unwrap(), None);
        store.put("slot", "hello").await.unwrap();
        assert_eq!(store.get("slot").await.unwrap().as_deref(), Some("hello"));
        store.remove("slot").await.unwrap();
        assert_eq!(store.get("slot").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let store = FileSaveStore::new(temp_dir.path().join("saves"));

        assert_eq!(store.get(DEFAULT_SLOT).await.unwrap(), None);

        store.put(DEFAULT_SLOT, "{}").await.unwrap();
        assert!(store.slot_path(DEFAULT_SLOT).exists());
        assert_eq!(store.get(DEFAULT_SLOT).await.unwrap().as_deref(), Some("{}"));

        store.remove(DEFAULT_SLOT).await.unwrap();
        store.remove(DEFAULT_SLOT).await.unwrap();
        assert_eq!(store.get(DEFAULT_SLOT).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_creates_nested_dir_and_reuses_it() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let store = FileSaveStore::new(temp_dir.path().join("a").join("b"));

        store.put("first", "1").await.unwrap();
        store.put("second", "2").await.unwrap();
        store.put("first", "3").await.unwrap();

        assert!(store.dir().is_dir());
        assert_eq!(store.get("first").await.unwrap().as_deref(), Some("3"));
        assert_eq!(store.get("second").await.unwrap().as_deref(), Some("2"));
    }
}
