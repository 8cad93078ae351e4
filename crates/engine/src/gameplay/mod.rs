mod health;
mod items;
mod quests;
mod skills;
mod stats;
mod status;

pub use health::{HealthComponent, ResourcePool};
pub use items::{EquipSlot, Equipment, Inventory, Item, ItemType};
pub use quests::{Quest, QuestLog, QuestStatus};
pub use skills::{Skill, SkillResource};
pub use stats::{StatBlock, StatType, UnknownStat};
pub use status::{Buff, BuffManager};
