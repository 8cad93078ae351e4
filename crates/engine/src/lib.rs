use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod gameplay;
pub mod persistence;
pub mod world;

pub use app::{
    plan_tick, CancelToken, GameTime, InputAction, InputSource, InputState, LoopClock, LoopConfig,
    LoopExitReason, LoopSummary, NullRenderer, Renderer, Scene, SceneManager, Scheduler,
    ScriptedInput, SystemClock, TickPlan, Updatable, Vec2, Vec3, MAX_TICK_DELTA, MIN_TICK_DELTA,
};
pub use gameplay::{
    Buff, BuffManager, EquipSlot, Equipment, HealthComponent, Inventory, Item, ItemType, Quest,
    QuestLog, QuestStatus, ResourcePool, Skill, SkillResource, StatBlock, StatType, UnknownStat,
};
pub use persistence::{
    PersistenceError, PlayerStateSnapshot, SaveRepository, SaveSnapshot, SnapshotRequest,
    CURRENT_SCHEMA_VERSION,
};
pub use world::{
    CollisionSystem, CombatSystem, Enemy, EnemyKilled, EnemySystem, Player, Projectile,
    ProjectileSystem, TerrainError, TerrainGenerator, TerrainMap, Tile, TileType,
    PLAYER_BASE_ATTACK, PLAYER_BASE_MAX_HEALTH, PLAYER_BASE_MAX_STAMINA,
};

pub const ROOT_ENV_VAR: &str = "SIMCORE_ROOT";
pub const SAVE_FILE_NAME: &str = "simcore.save.json";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub saves_dir: PathBuf,
}

impl AppPaths {
    pub fn from_root(root: PathBuf) -> Self {
        Self {
            data_dir: root.join("data"),
            saves_dir: root.join("saves"),
            root,
        }
    }

    pub fn settings_file(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }

    pub fn items_file(&self) -> PathBuf {
        self.data_dir.join("items.json")
    }

    pub fn save_file(&self) -> PathBuf {
        self.saves_dir.join(SAVE_FILE_NAME)
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
    #[error("{var} is set but does not point to a directory: {path}")]
    InvalidEnvRoot { var: &'static str, path: PathBuf },
}

pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    resolve_root().map(AppPaths::from_root)
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let normalized = normalize_path(Path::new(value.trim()));
            if normalized.is_dir() {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot {
                    var: ROOT_ENV_VAR,
                    path: normalized,
                })
            }
        }
        Err(env::VarError::NotPresent) => env::current_dir()
            .map(|dir| normalize_path(&dir))
            .map_err(StartupError::CurrentDir),
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
