use super::stats::{StatBlock, StatType};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Buff {
    stat: StatType,
    amount: f32,
    remaining_seconds: f32,
}

impl Buff {
    pub fn new(stat: StatType, amount: f32, duration_seconds: f32) -> Self {
        Self {
            stat,
            amount,
            remaining_seconds: duration_seconds,
        }
    }

    pub fn stat(&self) -> StatType {
        self.stat
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    pub fn remaining_seconds(&self) -> f32 {
        self.remaining_seconds
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_seconds <= 0.0
    }

    fn tick(&mut self, dt_seconds: f32) {
        self.remaining_seconds -= dt_seconds;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuffManager {
    buffs: Vec<Buff>,
}

impl BuffManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, buff: Buff) {
        self.buffs.push(buff);
    }

    pub fn buffs(&self) -> &[Buff] {
        &self.buffs
    }

    pub fn len(&self) -> usize {
        self.buffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty()
    }

    /// Counts every buff down, then drops the ones that ran out. Returns how many expired.
    pub fn update(&mut self, dt_seconds: f32) -> usize {
        for buff in &mut self.buffs {
            buff.tick(dt_seconds);
        }
        let before = self.buffs.len();
        self.buffs.retain(|buff| !buff.is_expired());
        before - self.buffs.len()
    }

    /// Buffs stack: each live buff adds on top of whatever bonus is already there.
    pub fn apply_bonuses(&self, stats: &mut StatBlock) {
        for buff in self.buffs.iter().filter(|buff| !buff.is_expired()) {
            stats.add_bonus(buff.stat(), buff.amount());
        }
    }
}
