use super::health::ResourcePool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillResource {
    None,
    Stamina,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Skill {
    id: String,
    cooldown_seconds: f32,
    resource: SkillResource,
    cost: f32,
    cooldown_remaining: f32,
}

impl Skill {
    pub fn new(
        id: impl Into<String>,
        cooldown_seconds: f32,
        resource: SkillResource,
        cost: f32,
    ) -> Self {
        Self {
            id: id.into(),
            cooldown_seconds,
            resource,
            cost,
            cooldown_remaining: 0.0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn cost(&self) -> f32 {
        self.cost
    }

    pub fn resource(&self) -> SkillResource {
        self.resource
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown_remaining
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining <= 0.0
    }

    /// Checks cooldown and resource first; only a cast that passes both pays and starts the cooldown.
    pub fn try_cast(&mut self, pool: &mut ResourcePool) -> bool {
        if !self.is_ready() {
            return false;
        }
        if self.resource == SkillResource::Stamina && !pool.consume(self.cost) {
            return false;
        }
        self.cooldown_remaining = self.cooldown_seconds;
        true
    }

    pub fn update(&mut self, dt_seconds: f32) {
        if self.cooldown_remaining > 0.0 {
            self.cooldown_remaining = (self.cooldown_remaining - dt_seconds).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dash() -> Skill {
        Skill::new("dash", 2.0, SkillResource::Stamina, 25.0)
    }

    #[test]
    fn insufficient_stamina_blocks_cast_without_starting_cooldown() {
        let mut skill = dash();
        let mut stamina = ResourcePool::new(100.0, 0.0);
        stamina.set_current(20.0);

        assert!(!skill.try_cast(&mut stamina));
        assert_eq!(skill.cooldown_remaining(), 0.0);
        assert_eq!(stamina.current(), 20.0);
    }

    #[test]
    fn cast_deducts_cost_and_starts_cooldown() {
        let mut skill = dash();
        let mut stamina = ResourcePool::new(100.0, 0.0);
        stamina.set_current(30.0);

        assert!(skill.try_cast(&mut stamina));
        assert_eq!(stamina.current(), 5.0);
        assert_eq!(skill.cooldown_remaining(), 2.0);

        stamina.set_current(100.0);
        skill.update(1.0);
        assert!(!skill.try_cast(&mut stamina));
        assert_eq!(stamina.current(), 100.0);
        assert_eq!(skill.cooldown_remaining(), 1.0);
    }

    #[test]
    fn cooldown_floors_at_zero() {
        let mut skill = dash();
        let mut stamina = ResourcePool::new(100.0, 0.0);
        assert!(skill.try_cast(&mut stamina));

        skill.update(5.0);
        assert_eq!(skill.cooldown_remaining(), 0.0);
        assert!(skill.is_ready());
    }

    #[test]
    fn resource_free_skill_ignores_pool() {
        let mut skill = Skill::new("shout", 1.0, SkillResource::None, 50.0);
        let mut stamina = ResourcePool::new(100.0, 0.0);
        stamina.set_current(0.0);

        assert!(skill.try_cast(&mut stamina));
        assert_eq!(stamina.current(), 0.0);
    }
}
