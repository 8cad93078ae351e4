use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatType {
    MaxHealth,
    MaxStamina,
    Attack,
    Defense,
    MoveSpeed,
}

impl StatType {
    pub const ALL: [StatType; 5] = [
        StatType::MaxHealth,
        StatType::MaxStamina,
        StatType::Attack,
        StatType::Defense,
        StatType::MoveSpeed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MaxHealth => "MaxHealth",
            Self::MaxStamina => "MaxStamina",
            Self::Attack => "Attack",
            Self::Defense => "Defense",
            Self::MoveSpeed => "MoveSpeed",
        }
    }
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown stat '{0}'")]
pub struct UnknownStat(pub String);

impl FromStr for StatType {
    type Err = UnknownStat;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        StatType::ALL
            .into_iter()
            .find(|stat| stat.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownStat(raw.to_string()))
    }
}

/// Base values plus a bonus layer that gets rebuilt from scratch on every recalculation.
/// Missing entries read as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatBlock {
    base: BTreeMap<StatType, f32>,
    bonus: BTreeMap<StatType, f32>,
}

impl StatBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_base(&mut self, stat: StatType, value: f32) {
        self.base.insert(stat, value);
    }

    pub fn set_bonus(&mut self, stat: StatType, value: f32) {
        self.bonus.insert(stat, value);
    }

    pub fn add_bonus(&mut self, stat: StatType, value: f32) {
        *self.bonus.entry(stat).or_insert(0.0) += value;
    }

    pub fn clear_bonuses(&mut self) {
        self.bonus.clear();
    }

    pub fn base(&self, stat: StatType) -> f32 {
        self.base.get(&stat).copied().unwrap_or(0.0)
    }

    pub fn bonus(&self, stat: StatType) -> f32 {
        self.bonus.get(&stat).copied().unwrap_or(0.0)
    }

    pub fn get(&self, stat: StatType) -> f32 {
        self.base(stat) + self.bonus(stat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entries_read_as_zero() {
        let stats = StatBlock::new();
        assert_eq!(stats.get(StatType::Attack), 0.0);
    }

    #[test]
    fn get_sums_base_and_bonus() {
        let mut stats = StatBlock::new();
        stats.set_base(StatType::Attack, 10.0);
        stats.set_bonus(StatType::Attack, 2.5);
        stats.add_bonus(StatType::Attack, 1.0);

        assert_eq!(stats.get(StatType::Attack), 13.5);
        assert_eq!(stats.base(StatType::Attack), 10.0);
        assert_eq!(stats.bonus(StatType::Attack), 3.5);
    }

    #[test]
    fn set_bonus_replaces_instead_of_accumulating() {
        let mut stats = StatBlock::new();
        stats.set_bonus(StatType::Defense, 4.0);
        stats.set_bonus(StatType::Defense, 1.0);
        assert_eq!(stats.get(StatType::Defense), 1.0);
    }

    #[test]
    fn clear_bonuses_keeps_base() {
        let mut stats = StatBlock::new();
        stats.set_base(StatType::MoveSpeed, 5.0);
        stats.add_bonus(StatType::MoveSpeed, 2.0);
        stats.clear_bonuses();
        assert_eq!(stats.get(StatType::MoveSpeed), 5.0);
    }

    #[test]
    fn stat_names_parse_case_insensitively() {
        assert_eq!("maxhealth".parse::<StatType>(), Ok(StatType::MaxHealth));
        assert_eq!(" MoveSpeed ".parse::<StatType>(), Ok(StatType::MoveSpeed));
        assert_eq!(
            "luck".parse::<StatType>(),
            Err(UnknownStat("luck".to_string()))
        );
    }
}
