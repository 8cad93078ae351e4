use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::stats::{StatBlock, StatType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Weapon,
    Armor,
    Consumable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquipSlot {
    Weapon,
    Armor,
}

impl ItemType {
    pub fn equip_slot(self) -> Option<EquipSlot> {
        match self {
            Self::Weapon => Some(EquipSlot::Weapon),
            Self::Armor => Some(EquipSlot::Armor),
            Self::Consumable => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    id: String,
    name: String,
    kind: ItemType,
    stat_bonuses: BTreeMap<StatType, f32>,
    value: i32,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: ItemType,
        stat_bonuses: BTreeMap<StatType, f32>,
        value: i32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            stat_bonuses,
            value,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ItemType {
        self.kind
    }

    pub fn stat_bonuses(&self) -> &BTreeMap<StatType, f32> {
        &self.stat_bonuses
    }

    pub fn stat_bonus(&self, stat: StatType) -> f32 {
        self.stat_bonuses.get(&stat).copied().unwrap_or(0.0)
    }

    pub fn value(&self) -> i32 {
        self.value
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Takes the first item with `id` out of the inventory.
    pub fn remove(&mut self, id: &str) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn find(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Equipment {
    weapon: Option<Item>,
    armor: Option<Item>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `item` in its slot and returns whatever it displaced.
    /// Items without a slot are handed back as `Err`.
    pub fn equip(&mut self, item: Item) -> Result<Option<Item>, Item> {
        let Some(slot) = item.kind().equip_slot() else {
            return Err(item);
        };
        Ok(self.slot_mut(slot).replace(item))
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Option<Item> {
        self.slot_mut(slot).take()
    }

    pub fn weapon(&self) -> Option<&Item> {
        self.weapon.as_ref()
    }

    pub fn armor(&self) -> Option<&Item> {
        self.armor.as_ref()
    }

    pub fn equipped(&self, slot: EquipSlot) -> Option<&Item> {
        match slot {
            EquipSlot::Weapon => self.weapon.as_ref(),
            EquipSlot::Armor => self.armor.as_ref(),
        }
    }

    /// Weapon first, then armor; for a stat both touch, the armor value wins.
    pub fn apply_bonuses(&self, stats: &mut StatBlock) {
        for item in self.weapon.iter().chain(self.armor.iter()) {
            for (stat, amount) in item.stat_bonuses() {
                stats.set_bonus(*stat, *amount);
            }
        }
    }

    fn slot_mut(&mut self, slot: EquipSlot) -> &mut Option<Item> {
        match slot {
            EquipSlot::Weapon => &mut self.weapon,
            EquipSlot::Armor => &mut self.armor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, kind: ItemType, bonuses: &[(StatType, f32)]) -> Item {
        Item::new(id, id, kind, bonuses.iter().copied().collect(), 0)
    }

    #[test]
    fn inventory_remove_transfers_ownership() {
        let mut inventory = Inventory::new();
        inventory.add(item("sword", ItemType::Weapon, &[]));
        inventory.add(item("potion", ItemType::Consumable, &[]));

        let sword = inventory.remove("sword").expect("sword present");
        assert_eq!(sword.id(), "sword");
        assert!(inventory.find("sword").is_none());
        assert!(inventory.remove("sword").is_none());
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn equipping_same_slot_replaces_previous_item() {
        let mut equipment = Equipment::new();
        assert_eq!(equipment.equip(item("dagger", ItemType::Weapon, &[])), Ok(None));

        let displaced = equipment
            .equip(item("axe", ItemType::Weapon, &[]))
            .expect("weapon slot");
        assert_eq!(displaced.map(|item| item.id().to_string()), Some("dagger".into()));
        assert_eq!(equipment.weapon().map(Item::id), Some("axe"));
        assert!(equipment.armor().is_none());
    }

    #[test]
    fn consumables_are_handed_back() {
        let mut equipment = Equipment::new();
        let potion = item("potion", ItemType::Consumable, &[]);
        assert_eq!(equipment.equip(potion.clone()), Err(potion));
        assert_eq!(equipment, Equipment::new());
    }

    #[test]
    fn armor_bonus_overwrites_weapon_bonus_for_same_stat() {
        let mut equipment = Equipment::new();
        equipment
            .equip(item(
                "blade",
                ItemType::Weapon,
                &[(StatType::Attack, 5.0), (StatType::Defense, 1.0)],
            ))
            .expect("equip weapon");
        equipment
            .equip(item("plate", ItemType::Armor, &[(StatType::Defense, 4.0)]))
            .expect("equip armor");

        let mut stats = StatBlock::new();
        equipment.apply_bonuses(&mut stats);

        assert_eq!(stats.bonus(StatType::Attack), 5.0);
        assert_eq!(stats.bonus(StatType::Defense), 4.0);
    }

    #[test]
    fn unequip_empties_slot() {
        let mut equipment = Equipment::new();
        equipment
            .equip(item("plate", ItemType::Armor, &[]))
            .expect("equip armor");
        assert!(equipment.unequip(EquipSlot::Armor).is_some());
        assert!(equipment.equipped(EquipSlot::Armor).is_none());
        assert!(equipment.unequip(EquipSlot::Armor).is_none());
    }
}
