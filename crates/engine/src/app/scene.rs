use std::ops::{Add, Mul, Sub};

use tracing::info;

use crate::world::TerrainMap;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn distance_squared(self, other: Vec2) -> f32 {
        (other - self).length_squared()
    }

    /// Returns zero when the length is at or below `epsilon`.
    pub fn normalized_or_zero(self, epsilon: f32) -> Vec2 {
        let length = self.length();
        if length > epsilon {
            Vec2::new(self.x / length, self.y / length)
        } else {
            Vec2::ZERO
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// A loaded level. Owns its terrain exclusively; other systems borrow it.
#[derive(Debug, Clone)]
pub struct Scene {
    id: String,
    terrain: TerrainMap,
}

impl Scene {
    pub fn new(id: impl Into<String>, terrain: TerrainMap) -> Self {
        Self {
            id: id.into(),
            terrain,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn terrain(&self) -> &TerrainMap {
        &self.terrain
    }

    pub fn terrain_mut(&mut self) -> &mut TerrainMap {
        &mut self.terrain
    }
}

#[derive(Debug)]
pub struct SceneManager {
    current: Scene,
}

impl SceneManager {
    pub fn new(initial: Scene) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> &Scene {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut Scene {
        &mut self.current
    }

    /// Swaps in `scene` and hands back the one it replaced.
    pub fn load(&mut self, scene: Scene) -> Scene {
        info!(from = self.current.id(), to = scene.id(), "scene_switched");
        std::mem::replace(&mut self.current, scene)
    }
}
