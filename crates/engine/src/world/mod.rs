mod collision;
mod entities;
mod generator;
mod systems;
mod terrain;

pub use collision::CollisionSystem;
pub use entities::{
    Enemy, Player, Projectile, PLAYER_BASE_ATTACK, PLAYER_BASE_MAX_HEALTH,
    PLAYER_BASE_MAX_STAMINA, PLAYER_STAMINA_REGEN_PER_SECOND,
};
pub use generator::{
    generate, TerrainGenerator, DEFAULT_CELL_SIZE, DEFAULT_FREQUENCY, DEFAULT_THRESHOLD,
};
pub use systems::{
    CombatSystem, EnemyKilled, EnemySystem, ProjectileSystem, HIT_RADIUS,
};
pub use terrain::{TerrainError, TerrainMap, Tile, TileType, MAX_TERRAIN_SIDE};
