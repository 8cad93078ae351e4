use std::fmt;

use tracing::debug;

use crate::app::Vec2;

use super::entities::{Enemy, Projectile};

pub const HIT_RADIUS: f32 = 0.5;
const ARRIVAL_EPSILON: f32 = 1e-4;

#[derive(Debug, Default)]
pub struct EnemySystem {
    enemies: Vec<Enemy>,
}

impl EnemySystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Drops dead enemies, then steps the rest `speed * dt` straight at `target`.
    pub fn update(&mut self, dt_seconds: f32, target: Vec2) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(|enemy| !enemy.health().is_dead());
        let removed = before - self.enemies.len();

        for enemy in &mut self.enemies {
            let offset = target - enemy.position();
            let distance = offset.length();
            if distance <= ARRIVAL_EPSILON {
                continue;
            }
            enemy.move_by(offset * (enemy.speed() * dt_seconds / distance));
        }
        removed
    }
}

#[derive(Debug, Default)]
pub struct ProjectileSystem {
    projectiles: Vec<Projectile>,
}

impl ProjectileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn projectiles_mut(&mut self) -> &mut [Projectile] {
        &mut self.projectiles
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    pub fn expire_where(&mut self, mut predicate: impl FnMut(&Projectile) -> bool) {
        for projectile in &mut self.projectiles {
            if predicate(projectile) {
                projectile.expire();
            }
        }
    }

    /// Advances live projectiles, then purges the expired ones.
    pub fn update(&mut self, dt_seconds: f32) {
        for projectile in self.projectiles.iter_mut().filter(|p| !p.is_expired()) {
            projectile.advance(dt_seconds);
        }
        self.projectiles.retain(|projectile| !projectile.is_expired());
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyKilled {
    pub enemy_index: usize,
    pub position: Vec2,
}

type KillSubscriber = Box<dyn FnMut(&EnemyKilled)>;

#[derive(Default)]
pub struct CombatSystem {
    subscribers: Vec<KillSubscriber>,
}

impl fmt::Debug for CombatSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombatSystem")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl CombatSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&EnemyKilled) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Each live projectile hits at most one enemy: the first living one strictly inside `HIT_RADIUS`.
    /// Subscribers hear about every kill exactly once; the kills are also returned.
    pub fn resolve_projectiles(
        &mut self,
        projectiles: &mut [Projectile],
        enemies: &mut [Enemy],
    ) -> Vec<EnemyKilled> {
        let radius_squared = HIT_RADIUS * HIT_RADIUS;
        let mut kills = Vec::new();

        for projectile in projectiles.iter_mut().filter(|p| !p.is_expired()) {
            let hit = enemies.iter_mut().enumerate().find(|(_, enemy)| {
                !enemy.health().is_dead()
                    && enemy.position().distance_squared(projectile.position()) < radius_squared
            });
            let Some((enemy_index, enemy)) = hit else {
                continue;
            };

            enemy.health_mut().apply_damage(projectile.damage());
            projectile.expire();
            debug!(
                enemy_index,
                damage = projectile.damage(),
                remaining = enemy.health().current(),
                "projectile_hit"
            );

            if enemy.health().is_dead() {
                let event = EnemyKilled {
                    enemy_index,
                    position: enemy.position(),
                };
                for subscriber in &mut self.subscribers {
                    subscriber(&event);
                }
                kills.push(event);
            }
        }
        kills
    }
}
