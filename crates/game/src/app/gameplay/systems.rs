use engine::{Buff, CollisionSystem, GameTime, Projectile, QuestStatus, StatType, Vec2};
use tracing::{debug, info};

use super::{
    GameplaySession, CULL_QUEST_ID, PROJECTILE_SPEED, QUEST_REWARD_ATTACK_BONUS,
    QUEST_REWARD_SECONDS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GameplaySystemId {
    Input,
    Movement,
    Skills,
    EnemyAi,
    Projectiles,
    Combat,
    Status,
    Render,
}

impl GameplaySystemId {
    #[cfg(test)]
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::Movement => "Movement",
            Self::Skills => "Skills",
            Self::EnemyAi => "EnemyAi",
            Self::Projectiles => "Projectiles",
            Self::Combat => "Combat",
            Self::Status => "Status",
            Self::Render => "Render",
        }
    }
}

pub(crate) const GAMEPLAY_SYSTEM_ORDER: [GameplaySystemId; 8] = [
    GameplaySystemId::Input,
    GameplaySystemId::Movement,
    GameplaySystemId::Skills,
    GameplaySystemId::EnemyAi,
    GameplaySystemId::Projectiles,
    GameplaySystemId::Combat,
    GameplaySystemId::Status,
    GameplaySystemId::Render,
];

impl GameplaySession {
    pub(super) fn run_system(&mut self, system_id: GameplaySystemId, time: &GameTime) {
        let dt = time.delta_seconds();
        match system_id {
            GameplaySystemId::Input => self.run_input_system(time),
            GameplaySystemId::Movement => self.run_movement_system(dt),
            GameplaySystemId::Skills => self.run_skills_system(dt),
            GameplaySystemId::EnemyAi => self.run_enemy_ai_system(dt),
            GameplaySystemId::Projectiles => self.run_projectile_system(dt),
            GameplaySystemId::Combat => self.run_combat_system(),
            GameplaySystemId::Status => self.player.update_status(dt),
            GameplaySystemId::Render => self.run_render_system(),
        }
    }

    fn run_input_system(&mut self, time: &GameTime) {
        self.frame_input = self.input.state(time);
        if self.frame_input.exit_requested() && !self.cancel.is_cancelled() {
            info!(elapsed_ms = time.elapsed().as_millis() as u64, "exit_requested");
            self.cancel.cancel();
        }
    }

    fn run_movement_system(&mut self, dt: f32) {
        let direction = self.frame_input.direction();
        if direction == Vec2::ZERO {
            return;
        }
        self.facing = direction;

        let terrain = self.scenes.current().terrain();
        let from = self.player.position();
        let step = direction * (self.player.speed() * dt);
        let to = CollisionSystem::new(terrain).resolve_move(from, step);
        if to == from {
            debug!(x = from.x, y = from.y, "player_move_blocked");
            return;
        }
        self.player.set_position(to);
        self.player.set_elevation(terrain.height_at_world(to.x, to.y));
    }

    fn run_skills_system(&mut self, dt: f32) {
        self.fire_skill.update(dt);
        if !self.frame_input.fire_pressed() {
            return;
        }
        if !self.fire_skill.try_cast(self.player.stamina_mut()) {
            return;
        }
        let origin = self.player.position();
        let damage = self.player.attack();
        self.projectiles.spawn(Projectile::new(
            origin,
            self.facing * PROJECTILE_SPEED,
            damage,
        ));
        debug!(
            skill = self.fire_skill.id(),
            x = origin.x,
            y = origin.y,
            damage,
            stamina = self.player.stamina().current(),
            "projectile_fired"
        );
    }

    fn run_enemy_ai_system(&mut self, dt: f32) {
        let removed = self.enemies.update(dt, self.player.position());
        if removed > 0 {
            debug!(removed, remaining = self.enemies.len(), "dead_enemies_removed");
        }
    }

    fn run_projectile_system(&mut self, dt: f32) {
        self.projectiles.update(dt);
        let terrain = self.scenes.current().terrain();
        let world_width = terrain.width() as f32 * terrain.cell_size();
        let world_height = terrain.height() as f32 * terrain.cell_size();
        self.projectiles.expire_where(|projectile| {
            let position = projectile.position();
            !(0.0..world_width).contains(&position.x)
                || !(0.0..world_height).contains(&position.y)
        });
    }

    fn run_combat_system(&mut self) {
        let kills = self.combat.resolve_projectiles(
            self.projectiles.projectiles_mut(),
            self.enemies.enemies_mut(),
        );
        for _ in &kills {
            self.total_kills = self.total_kills.saturating_add(1);
            self.quests.on_enemy_killed();
        }

        let completed = self
            .quests
            .find(CULL_QUEST_ID)
            .is_some_and(|quest| quest.status() == QuestStatus::Completed);
        if completed && self.quests.turn_in(CULL_QUEST_ID) {
            self.player.add_buff(Buff::new(
                StatType::Attack,
                QUEST_REWARD_ATTACK_BONUS,
                QUEST_REWARD_SECONDS,
            ));
            info!(
                quest = CULL_QUEST_ID,
                attack = self.player.attack(),
                "quest_reward_granted"
            );
        }
    }

    fn run_render_system(&mut self) {
        self.renderer.clear();
        let player = self.player.position();
        self.renderer.draw_sprite("player", player.x, player.y);
        for enemy in self.enemies.enemies() {
            if enemy.health().is_dead() {
                continue;
            }
            let position = enemy.position();
            self.renderer.draw_sprite("enemy", position.x, position.y);
        }
        for projectile in self.projectiles.projectiles() {
            let position = projectile.position();
            self.renderer.draw_sprite("projectile", position.x, position.y);
        }
        self.renderer.present();
    }
}
