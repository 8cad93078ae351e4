use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::atomic_io::{copy_to_backup, write_text_atomic};
use super::PersistenceError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRow {
    pub id: i64,
    pub name: String,
    pub created_at: u64,
    pub updated_at: u64,
    pub play_time_seconds: f64,
    pub world_seed: i32,
    pub schema_version: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStateRow {
    pub id: i64,
    pub save_id: i64,
    pub scene_id: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub hp: f32,
    pub stamina: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct StoreDocument {
    next_id: i64,
    saves: Vec<SaveRow>,
    player_states: Vec<PlayerStateRow>,
}

impl StoreDocument {
    fn allocate_id(&mut self) -> i64 {
        self.next_id = self.next_id.max(0) + 1;
        self.next_id
    }
}

/// The on-disk save tables. Reads go against the last committed document; writes go
/// through [`Transaction`].
#[derive(Debug)]
pub struct SaveStore {
    path: PathBuf,
    document: StoreDocument,
}

impl SaveStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        let document = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str::<StoreDocument>(&raw).map_err(|source| {
                PersistenceError::Decode {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(error) if error.kind() == io::ErrorKind::NotFound => StoreDocument::default(),
            Err(source) => return Err(PersistenceError::Io { path, source }),
        };
        debug!(
            path = %path.display(),
            saves = document.saves.len(),
            "save_store_opened"
        );
        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn saves(&self) -> &[SaveRow] {
        &self.document.saves
    }

    pub fn player_states(&self) -> &[PlayerStateRow] {
        &self.document.player_states
    }

    pub fn player_state_for(&self, save_id: i64) -> Option<&PlayerStateRow> {
        self.document
            .player_states
            .iter()
            .find(|row| row.save_id == save_id)
    }

    pub fn begin(&mut self) -> Transaction<'_> {
        let staged = self.document.clone();
        Transaction {
            store: self,
            staged,
            committed: false,
        }
    }
}

/// Staged edits against a copy of the tables. Nothing reaches disk or the store until
/// [`Transaction::commit`]; dropping it uncommitted discards every edit.
#[derive(Debug)]
pub struct Transaction<'a> {
    store: &'a mut SaveStore,
    staged: StoreDocument,
    committed: bool,
}

impl Transaction<'_> {
    /// `id` on the row is ignored and replaced by a freshly allocated one.
    pub fn insert_save(&mut self, mut row: SaveRow) -> i64 {
        row.id = self.staged.allocate_id();
        let id = row.id;
        self.staged.saves.push(row);
        id
    }

    pub fn insert_player_state(&mut self, mut row: PlayerStateRow) -> Result<i64, PersistenceError> {
        if !self.staged.saves.iter().any(|save| save.id == row.save_id) {
            return Err(PersistenceError::ForeignKeyViolation {
                save_id: row.save_id,
            });
        }
        row.id = self.staged.allocate_id();
        let id = row.id;
        self.staged.player_states.push(row);
        Ok(id)
    }

    /// Removes the save row and its player-state rows. Returns whether the save existed.
    pub fn delete_save(&mut self, save_id: i64) -> bool {
        let before = self.staged.saves.len();
        self.staged.saves.retain(|save| save.id != save_id);
        let removed = self.staged.saves.len() != before;
        if removed {
            self.staged
                .player_states
                .retain(|row| row.save_id != save_id);
        }
        removed
    }

    pub fn commit(mut self) -> Result<(), PersistenceError> {
        let text = serde_json::to_string_pretty(&self.staged).map_err(PersistenceError::Encode)?;

        let path = self.store.path.clone();
        match copy_to_backup(&path) {
            Ok(Some(backup)) => debug!(backup = %backup.display(), "save_backup_written"),
            Ok(None) => {}
            Err(error) => warn!(path = %path.display(), error = %error, "save_backup_failed"),
        }

        write_text_atomic(&path, &text).map_err(|source| PersistenceError::Io {
            path: path.clone(),
            source,
        })?;

        self.store.document = std::mem::take(&mut self.staged);
        self.committed = true;
        debug!(path = %path.display(), "transaction_committed");
        Ok(())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.committed {
            debug!(path = %self.store.path.display(), "transaction_rolled_back");
        }
    }
}
