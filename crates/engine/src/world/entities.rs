use tracing::debug;

use crate::app::Vec2;
use crate::gameplay::{
    Buff, BuffManager, EquipSlot, Equipment, HealthComponent, Inventory, ItemType, ResourcePool,
    StatBlock, StatType,
};

pub const PLAYER_BASE_MAX_HEALTH: f32 = 100.0;
pub const PLAYER_BASE_MAX_STAMINA: f32 = 100.0;
pub const PLAYER_BASE_ATTACK: f32 = 10.0;
pub const PLAYER_STAMINA_REGEN_PER_SECOND: f32 = 10.0;

#[derive(Debug, Clone)]
pub struct Player {
    position: Vec2,
    elevation: f32,
    stats: StatBlock,
    health: HealthComponent,
    stamina: ResourcePool,
    inventory: Inventory,
    equipment: Equipment,
    buffs: BuffManager,
}

impl Player {
    pub fn new(position: Vec2, move_speed: f32) -> Self {
        let mut stats = StatBlock::new();
        stats.set_base(StatType::MoveSpeed, move_speed);
        stats.set_base(StatType::MaxHealth, PLAYER_BASE_MAX_HEALTH);
        stats.set_base(StatType::MaxStamina, PLAYER_BASE_MAX_STAMINA);
        stats.set_base(StatType::Attack, PLAYER_BASE_ATTACK);

        Self {
            position,
            elevation: 0.0,
            stats,
            health: HealthComponent::new(PLAYER_BASE_MAX_HEALTH),
            stamina: ResourcePool::new(PLAYER_BASE_MAX_STAMINA, PLAYER_STAMINA_REGEN_PER_SECOND),
            inventory: Inventory::new(),
            equipment: Equipment::new(),
            buffs: BuffManager::new(),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn move_by(&mut self, delta: Vec2) {
        self.position = self.position + delta;
    }

    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    pub fn set_elevation(&mut self, elevation: f32) {
        self.elevation = elevation;
    }

    pub fn speed(&self) -> f32 {
        self.stats.get(StatType::MoveSpeed)
    }

    pub fn attack(&self) -> f32 {
        self.stats.get(StatType::Attack)
    }

    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut StatBlock {
        &mut self.stats
    }

    pub fn health(&self) -> &HealthComponent {
        &self.health
    }

    pub fn health_mut(&mut self) -> &mut HealthComponent {
        &mut self.health
    }

    pub fn stamina(&self) -> &ResourcePool {
        &self.stamina
    }

    pub fn stamina_mut(&mut self) -> &mut ResourcePool {
        &mut self.stamina
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn equipment(&self) -> &Equipment {
        &self.equipment
    }

    pub fn buffs(&self) -> &BuffManager {
        &self.buffs
    }

    /// Moves the item from the inventory into its slot; a displaced item goes back to the inventory.
    /// Unknown ids and unequippable items are left where they are.
    pub fn equip_from_inventory(&mut self, id: &str) -> bool {
        let equippable = self
            .inventory
            .find(id)
            .is_some_and(|item| item.kind().equip_slot().is_some());
        if !equippable {
            return false;
        }
        let Some(item) = self.inventory.remove(id) else {
            return false;
        };
        match self.equipment.equip(item) {
            Ok(displaced) => {
                if let Some(previous) = displaced {
                    self.inventory.add(previous);
                }
            }
            Err(item) => self.inventory.add(item),
        }
        self.recalculate();
        debug!(item = id, "item_equipped");
        true
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> bool {
        let Some(item) = self.equipment.unequip(slot) else {
            return false;
        };
        self.inventory.add(item);
        self.recalculate();
        true
    }

    /// Consumables heal by their `MaxHealth` bonus and are used up.
    pub fn use_consumable(&mut self, id: &str) -> bool {
        let is_consumable = self
            .inventory
            .find(id)
            .is_some_and(|item| item.kind() == ItemType::Consumable);
        if !is_consumable {
            return false;
        }
        let Some(item) = self.inventory.remove(id) else {
            return false;
        };
        self.health.heal(item.stat_bonus(StatType::MaxHealth));
        true
    }

    pub fn add_buff(&mut self, buff: Buff) {
        self.buffs.add(buff);
        self.recalculate();
    }

    /// Per-tick status upkeep: buff timers, stamina regen, then a fresh stat pass.
    pub fn update_status(&mut self, dt_seconds: f32) {
        let expired = self.buffs.update(dt_seconds);
        if expired > 0 {
            debug!(expired, "buffs_expired");
        }
        self.stamina.update(dt_seconds);
        self.recalculate();
    }

    /// Rebuilds the bonus layer from equipment and live buffs, then resyncs pool maxima
    /// without refilling them.
    pub fn recalculate(&mut self) {
        self.stats.clear_bonuses();
        self.equipment.apply_bonuses(&mut self.stats);
        self.buffs.apply_bonuses(&mut self.stats);
        self.health
            .set_max(self.stats.get(StatType::MaxHealth), false);
        self.stamina
            .set_max(self.stats.get(StatType::MaxStamina), false);
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    position: Vec2,
    speed: f32,
    health: HealthComponent,
}

impl Enemy {
    pub fn new(position: Vec2, speed: f32, max_health: f32) -> Self {
        Self {
            position,
            speed,
            health: HealthComponent::new(max_health),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn health(&self) -> &HealthComponent {
        &self.health
    }

    pub fn health_mut(&mut self) -> &mut HealthComponent {
        &mut self.health
    }

    pub fn move_by(&mut self, delta: Vec2) {
        self.position = self.position + delta;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    position: Vec2,
    velocity: Vec2,
    damage: f32,
    expired: bool,
}

impl Projectile {
    pub fn new(position: Vec2, velocity: Vec2, damage: f32) -> Self {
        Self {
            position,
            velocity,
            damage,
            expired: false,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn damage(&self) -> f32 {
        self.damage
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn expire(&mut self) {
        self.expired = true;
    }

    pub fn advance(&mut self, dt_seconds: f32) {
        self.position = self.position + self.velocity * dt_seconds;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::gameplay::Item;

    fn item(id: &str, kind: ItemType, bonuses: &[(StatType, f32)]) -> Item {
        Item::new(id, id, kind, bonuses.iter().copied().collect::<BTreeMap<_, _>>(), 1)
    }

    fn player() -> Player {
        Player::new(Vec2::new(1.0, 1.0), 5.0)
    }

    #[test]
    fn equip_moves_item_out_of_inventory_and_applies_bonus() {
        let mut player = player();
        player
            .inventory_mut()
            .add(item("sword", ItemType::Weapon, &[(StatType::Attack, 5.0)]));

        assert!(player.equip_from_inventory("sword"));
        assert!(player.inventory().is_empty());
        assert_eq!(player.attack(), PLAYER_BASE_ATTACK + 5.0);
    }

    #[test]
    fn equipping_displaced_item_returns_to_inventory() {
        let mut player = player();
        player
            .inventory_mut()
            .add(item("dagger", ItemType::Weapon, &[(StatType::Attack, 2.0)]));
        player
            .inventory_mut()
            .add(item("axe", ItemType::Weapon, &[(StatType::Attack, 7.0)]));

        assert!(player.equip_from_inventory("dagger"));
        assert!(player.equip_from_inventory("axe"));

        assert_eq!(player.attack(), PLAYER_BASE_ATTACK + 7.0);
        assert!(player.inventory().find("dagger").is_some());
        assert!(player.inventory().find("axe").is_none());
    }

    #[test]
    fn consumables_and_unknown_ids_are_not_equipped() {
        let mut player = player();
        player
            .inventory_mut()
            .add(item("potion", ItemType::Consumable, &[(StatType::MaxHealth, 20.0)]));

        assert!(!player.equip_from_inventory("potion"));
        assert!(!player.equip_from_inventory("ghost"));
        assert_eq!(player.inventory().len(), 1);
    }

    #[test]
    fn recalculate_is_idempotent() {
        let mut player = player();
        player
            .inventory_mut()
            .add(item("plate", ItemType::Armor, &[(StatType::Defense, 3.0)]));
        player.equip_from_inventory("plate");
        player.add_buff(Buff::new(StatType::Defense, 1.5, 10.0));

        player.recalculate();
        let first = player.stats().clone();
        player.recalculate();
        assert_eq!(player.stats(), &first);
        assert_eq!(player.stats().get(StatType::Defense), 4.5);
    }

    #[test]
    fn max_health_change_does_not_refill_current() {
        let mut player = player();
        player.health_mut().apply_damage(40.0);
        player
            .inventory_mut()
            .add(item("plate", ItemType::Armor, &[(StatType::MaxHealth, 50.0)]));

        player.equip_from_inventory("plate");
        assert_eq!(player.health().max(), 150.0);
        assert_eq!(player.health().current(), 60.0);

        player.unequip(EquipSlot::Armor);
        assert_eq!(player.health().max(), 100.0);
        assert_eq!(player.health().current(), 60.0);
    }

    #[test]
    fn buffs_on_speed_stack_and_expire_with_status_updates() {
        let mut player = player();
        player.add_buff(Buff::new(StatType::MoveSpeed, 2.0, 1.0));
        player.add_buff(Buff::new(StatType::MoveSpeed, 2.0, 1.0));
        assert_eq!(player.stats().bonus(StatType::MoveSpeed), 4.0);
        assert_eq!(player.speed(), 9.0);

        player.update_status(1.0);
        assert_eq!(player.stats().bonus(StatType::MoveSpeed), 0.0);
        assert_eq!(player.speed(), 5.0);
    }

    #[test]
    fn consumable_heals_and_is_used_up() {
        let mut player = player();
        player.health_mut().apply_damage(50.0);
        player
            .inventory_mut()
            .add(item("potion", ItemType::Consumable, &[(StatType::MaxHealth, 20.0)]));

        assert!(player.use_consumable("potion"));
        assert_eq!(player.health().current(), 70.0);
        assert!(!player.use_consumable("potion"));
    }

    #[test]
    fn projectile_advances_along_velocity() {
        let mut projectile = Projectile::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, -1.0), 5.0);
        projectile.advance(0.5);
        assert_eq!(projectile.position(), Vec2::new(1.0, -0.5));
    }
}
