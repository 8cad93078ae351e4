/// Hit points clamped to `[0, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthComponent {
    max: f32,
    current: f32,
}

impl HealthComponent {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { max, current: max }
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn apply_damage(&mut self, amount: f32) {
        self.current = (self.current - amount.max(0.0)).max(0.0);
    }

    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount.max(0.0)).min(self.max);
    }

    pub fn set_current(&mut self, value: f32) {
        self.current = value.clamp(0.0, self.max);
    }

    /// With `fill == false` the current value is kept, only clipped to the new max.
    pub fn set_max(&mut self, max: f32, fill: bool) {
        self.max = max.max(0.0);
        self.current = if fill {
            self.max
        } else {
            self.current.min(self.max)
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourcePool {
    max: f32,
    current: f32,
    regen_per_second: f32,
}

impl ResourcePool {
    pub fn new(max: f32, regen_per_second: f32) -> Self {
        let max = max.max(0.0);
        Self {
            max,
            current: max,
            regen_per_second,
        }
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn regen_per_second(&self) -> f32 {
        self.regen_per_second
    }

    pub fn set_regen_per_second(&mut self, regen_per_second: f32) {
        self.regen_per_second = regen_per_second;
    }

    pub fn set_current(&mut self, value: f32) {
        self.current = value.clamp(0.0, self.max);
    }

    pub fn has(&self, amount: f32) -> bool {
        self.current >= amount
    }

    /// All-or-nothing: an insufficient pool is left untouched.
    pub fn consume(&mut self, amount: f32) -> bool {
        if !self.has(amount) {
            return false;
        }
        self.current -= amount.max(0.0);
        true
    }

    pub fn update(&mut self, dt_seconds: f32) {
        if self.current < self.max {
            self.current = (self.current + self.regen_per_second * dt_seconds).min(self.max);
        }
    }

    pub fn set_max(&mut self, max: f32, fill: bool) {
        self.max = max.max(0.0);
        self.current = if fill {
            self.max
        } else {
            self.current.min(self.max)
        };
    }
}
