mod systems;

use engine::{
    CancelToken, CollisionSystem, CombatSystem, Enemy, EnemySystem, GameTime, InputSource,
    InputState, Item, ItemType, Player, PlayerStateSnapshot, ProjectileSystem, Quest, QuestLog,
    Renderer, SaveSnapshot, Scene, SceneManager, Skill, SkillResource, SnapshotRequest,
    TerrainError, TerrainGenerator, TerrainMap, Updatable, Vec2, Vec3,
};
use tracing::{info, warn};

use super::config::EngineSettings;

pub(crate) use systems::{GameplaySystemId, GAMEPLAY_SYSTEM_ORDER};

pub(crate) const OVERWORLD_SCENE_ID: &str = "overworld";
pub(crate) const FIRE_SKILL_ID: &str = "fire_bolt";
pub(crate) const FIRE_COOLDOWN_SECONDS: f32 = 0.5;
pub(crate) const FIRE_STAMINA_COST: f32 = 10.0;
pub(crate) const PROJECTILE_SPEED: f32 = 8.0;
pub(crate) const ENEMY_SPEED: f32 = 1.5;
pub(crate) const ENEMY_MAX_HEALTH: f32 = 20.0;
pub(crate) const CULL_QUEST_ID: &str = "cull_the_pack";
pub(crate) const CULL_QUEST_KILLS: u32 = 3;
pub(crate) const QUEST_REWARD_ATTACK_BONUS: f32 = 5.0;
pub(crate) const QUEST_REWARD_SECONDS: f32 = 30.0;

/// Everything the simulation owns for one play session. Registered with the scheduler as
/// a single system and stepped through [`GAMEPLAY_SYSTEM_ORDER`] on every tick.
pub(crate) struct GameplaySession {
    world_seed: i32,
    scenes: SceneManager,
    player: Player,
    facing: Vec2,
    fire_skill: Skill,
    enemies: EnemySystem,
    projectiles: ProjectileSystem,
    combat: CombatSystem,
    quests: QuestLog,
    input: Box<dyn InputSource>,
    frame_input: InputState,
    renderer: Box<dyn Renderer>,
    cancel: CancelToken,
    play_time_seconds: f64,
    total_kills: u32,
    last_tick_order: Vec<GameplaySystemId>,
}

impl GameplaySession {
    pub(crate) fn new(
        world_seed: i32,
        scene: Scene,
        player: Player,
        input: Box<dyn InputSource>,
        renderer: Box<dyn Renderer>,
        cancel: CancelToken,
    ) -> Self {
        let mut combat = CombatSystem::new();
        combat.subscribe(|event| {
            info!(
                enemy_index = event.enemy_index,
                x = event.position.x,
                y = event.position.y,
                "enemy_killed"
            );
        });

        Self {
            world_seed,
            scenes: SceneManager::new(scene),
            player,
            facing: Vec2::new(1.0, 0.0),
            fire_skill: Skill::new(
                FIRE_SKILL_ID,
                FIRE_COOLDOWN_SECONDS,
                SkillResource::Stamina,
                FIRE_STAMINA_COST,
            ),
            enemies: EnemySystem::new(),
            projectiles: ProjectileSystem::new(),
            combat,
            quests: QuestLog::new(),
            input,
            frame_input: InputState::empty(),
            renderer,
            cancel,
            play_time_seconds: 0.0,
            total_kills: 0,
            last_tick_order: Vec::with_capacity(GAMEPLAY_SYSTEM_ORDER.len()),
        }
    }

    /// Generates the overworld, places the player on the walkable tile nearest the centre,
    /// hands over the starting items and populates enemies and the opening quest.
    pub(crate) fn build(
        settings: &EngineSettings,
        items: Vec<Item>,
        input: Box<dyn InputSource>,
        renderer: Box<dyn Renderer>,
        cancel: CancelToken,
    ) -> Result<Self, TerrainError> {
        let terrain = TerrainGenerator::new(settings.world_seed)
            .generate(settings.world_width, settings.world_height)?;
        let spawn = spawn_point(&terrain);
        let mut player = Player::new(spawn, settings.player_speed);
        player.set_elevation(terrain.height_at_world(spawn.x, spawn.y));

        for item in items {
            player.inventory_mut().add(item);
        }
        for kind in [ItemType::Weapon, ItemType::Armor] {
            let first = player
                .inventory()
                .items()
                .iter()
                .find(|item| item.kind() == kind)
                .map(|item| item.id().to_string());
            if let Some(id) = first {
                player.equip_from_inventory(&id);
            }
        }

        let enemy_spawns = enemy_spawn_points(&terrain);
        let mut session = Self::new(
            settings.world_seed,
            Scene::new(OVERWORLD_SCENE_ID, terrain),
            player,
            input,
            renderer,
            cancel,
        );
        for position in enemy_spawns {
            session.spawn_enemy(Enemy::new(position, ENEMY_SPEED, ENEMY_MAX_HEALTH));
        }
        session.accept_quest(Quest::new(CULL_QUEST_ID, "Cull the pack", CULL_QUEST_KILLS));

        info!(
            seed = settings.world_seed,
            spawn_x = spawn.x,
            spawn_y = spawn.y,
            enemies = session.enemies.len(),
            walkable = session.terrain().walkable_count(),
            "world_built"
        );
        Ok(session)
    }

    pub(crate) fn spawn_enemy(&mut self, enemy: Enemy) {
        self.enemies.spawn(enemy);
    }

    pub(crate) fn accept_quest(&mut self, quest: Quest) -> bool {
        self.quests.accept(quest)
    }

    #[cfg(test)]
    pub(crate) fn world_seed(&self) -> i32 {
        self.world_seed
    }

    pub(crate) fn scene_id(&self) -> &str {
        self.scenes.current().id()
    }

    pub(crate) fn terrain(&self) -> &TerrainMap {
        self.scenes.current().terrain()
    }

    pub(crate) fn player(&self) -> &Player {
        &self.player
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub(crate) fn enemies(&self) -> &EnemySystem {
        &self.enemies
    }

    #[cfg(test)]
    pub(crate) fn projectiles(&self) -> &ProjectileSystem {
        &self.projectiles
    }

    #[cfg(test)]
    pub(crate) fn quests(&self) -> &QuestLog {
        &self.quests
    }

    pub(crate) fn total_kills(&self) -> u32 {
        self.total_kills
    }

    pub(crate) fn play_time_seconds(&self) -> f64 {
        self.play_time_seconds
    }

    #[cfg(test)]
    pub(crate) fn last_tick_order(&self) -> &[GameplaySystemId] {
        &self.last_tick_order
    }

    /// Applies a save from the same world. Saves for another seed or scene are ignored, and a
    /// stored position that is no longer walkable keeps the fresh spawn point.
    pub(crate) fn restore(&mut self, snapshot: &SaveSnapshot) -> bool {
        if snapshot.world_seed != self.world_seed {
            info!(
                save_seed = snapshot.world_seed,
                world_seed = self.world_seed,
                "save_ignored_seed_mismatch"
            );
            return false;
        }
        let PlayerStateSnapshot {
            scene_id,
            position,
            hp,
            stamina,
        } = &snapshot.player_state;
        if scene_id != self.scene_id() {
            info!(save_scene = %scene_id, "save_ignored_scene_mismatch");
            return false;
        }

        let stored = Vec2::new(position.x, position.y);
        if CollisionSystem::new(self.terrain()).can_move_to(stored.x, stored.y) {
            let elevation = self.terrain().height_at_world(stored.x, stored.y);
            self.player.set_position(stored);
            self.player.set_elevation(elevation);
        } else {
            warn!(x = stored.x, y = stored.y, "saved_position_not_walkable");
        }
        self.player.health_mut().set_current(*hp);
        self.player.stamina_mut().set_current(*stamina);
        self.play_time_seconds = snapshot.play_time_seconds.max(0.0);

        info!(
            save_id = snapshot.id,
            name = %snapshot.name,
            hp = self.player.health().current(),
            stamina = self.player.stamina().current(),
            "save_restored"
        );
        true
    }

    pub(crate) fn snapshot_request(&self, name: &str) -> SnapshotRequest {
        let position = self.player.position();
        SnapshotRequest {
            name: name.to_string(),
            world_seed: self.world_seed,
            scene_id: self.scene_id().to_string(),
            position: Vec3::new(position.x, position.y, self.player.elevation()),
            hp: self.player.health().current(),
            stamina: self.player.stamina().current(),
            play_time_seconds: self.play_time_seconds,
        }
    }
}

impl Updatable for GameplaySession {
    fn update(&mut self, time: &GameTime) {
        self.play_time_seconds += time.delta().as_secs_f64();
        self.last_tick_order.clear();
        for system_id in GAMEPLAY_SYSTEM_ORDER {
            self.last_tick_order.push(system_id);
            self.run_system(system_id, time);
        }
    }
}

fn tile_centre(terrain: &TerrainMap, (x, y): (i32, i32)) -> Vec2 {
    let cell = terrain.cell_size();
    Vec2::new((x as f32 + 0.5) * cell, (y as f32 + 0.5) * cell)
}

fn spawn_point(terrain: &TerrainMap) -> Vec2 {
    let centre = (terrain.width() as i32 / 2, terrain.height() as i32 / 2);
    match terrain.find_walkable_near(centre.0, centre.1) {
        Some(tile) => tile_centre(terrain, tile),
        None => {
            warn!(x = centre.0, y = centre.1, "no_walkable_spawn_tile");
            tile_centre(terrain, centre)
        }
    }
}

fn enemy_spawn_points(terrain: &TerrainMap) -> Vec<Vec2> {
    let width = terrain.width() as i32;
    let height = terrain.height() as i32;
    let anchors = [
        (width / 4, height / 4),
        (width * 3 / 4, height / 4),
        (width / 2, height * 3 / 4),
    ];

    let mut points: Vec<Vec2> = Vec::with_capacity(anchors.len());
    for (x, y) in anchors {
        let Some(tile) = terrain.find_walkable_near(x, y) else {
            continue;
        };
        let point = tile_centre(terrain, tile);
        if !points.contains(&point) {
            points.push(point);
        }
    }
    points
}
