use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::info;

use crate::app::Vec3;

use super::store::{PlayerStateRow, SaveRow, SaveStore};
use super::{PersistenceError, CURRENT_SCHEMA_VERSION};

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRequest {
    pub name: String,
    pub world_seed: i32,
    pub scene_id: String,
    pub position: Vec3,
    pub hp: f32,
    pub stamina: f32,
    pub play_time_seconds: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStateSnapshot {
    pub scene_id: String,
    pub position: Vec3,
    pub hp: f32,
    pub stamina: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveSnapshot {
    pub id: i64,
    pub name: String,
    pub created_at: u64,
    pub updated_at: u64,
    pub play_time_seconds: f64,
    pub world_seed: i32,
    pub schema_version: u32,
    pub player_state: PlayerStateSnapshot,
}

#[derive(Debug)]
pub struct SaveRepository {
    store: SaveStore,
}

impl SaveRepository {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        Ok(Self {
            store: SaveStore::open(path)?,
        })
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub fn list_saves(&self) -> &[SaveRow] {
        self.store.saves()
    }

    /// Writes the save row and its player-state row in one commit and returns the save id.
    pub fn save_snapshot(&mut self, request: &SnapshotRequest) -> Result<i64, PersistenceError> {
        let now = now_unix_seconds();
        let mut tx = self.store.begin();
        let save_id = tx.insert_save(SaveRow {
            id: 0,
            name: request.name.clone(),
            created_at: now,
            updated_at: now,
            play_time_seconds: request.play_time_seconds,
            world_seed: request.world_seed,
            schema_version: CURRENT_SCHEMA_VERSION,
        });
        tx.insert_player_state(PlayerStateRow {
            id: 0,
            save_id,
            scene_id: request.scene_id.clone(),
            x: request.position.x,
            y: request.position.y,
            z: request.position.z,
            hp: request.hp,
            stamina: request.stamina,
        })?;
        tx.commit()?;

        info!(
            save_id,
            name = %request.name,
            seed = request.world_seed,
            "snapshot_saved"
        );
        Ok(save_id)
    }

    /// Most recently updated save joined with its player state. `Ok(None)` when there are
    /// no saves; a save written under another schema version is an error.
    pub fn load_latest(&self) -> Result<Option<SaveSnapshot>, PersistenceError> {
        let Some(save) = self
            .store
            .saves()
            .iter()
            .max_by_key(|save| (save.updated_at, save.id))
        else {
            return Ok(None);
        };

        if save.schema_version != CURRENT_SCHEMA_VERSION {
            return Err(PersistenceError::SchemaMismatch {
                found: save.schema_version,
                expected: CURRENT_SCHEMA_VERSION,
            });
        }

        let state = self
            .store
            .player_state_for(save.id)
            .ok_or(PersistenceError::MissingPlayerState { save_id: save.id })?;

        Ok(Some(SaveSnapshot {
            id: save.id,
            name: save.name.clone(),
            created_at: save.created_at,
            updated_at: save.updated_at,
            play_time_seconds: save.play_time_seconds,
            world_seed: save.world_seed,
            schema_version: save.schema_version,
            player_state: PlayerStateSnapshot {
                scene_id: state.scene_id.clone(),
                position: Vec3::new(state.x, state.y, state.z),
                hp: state.hp,
                stamina: state.stamina,
            },
        }))
    }

    pub fn delete_save(&mut self, save_id: i64) -> Result<bool, PersistenceError> {
        let mut tx = self.store.begin();
        if !tx.delete_save(save_id) {
            return Ok(false);
        }
        tx.commit()?;
        info!(save_id, "snapshot_deleted");
        Ok(true)
    }
}

fn now_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}
