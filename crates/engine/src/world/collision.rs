use crate::app::Vec2;

use super::terrain::TerrainMap;

#[derive(Debug, Clone, Copy)]
pub struct CollisionSystem<'a> {
    terrain: &'a TerrainMap,
}

impl<'a> CollisionSystem<'a> {
    pub fn new(terrain: &'a TerrainMap) -> Self {
        Self { terrain }
    }

    pub fn can_move_to(&self, x: f32, y: f32) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        self.terrain.is_walkable(x.floor() as i32, y.floor() as i32)
    }

    /// Reject-and-stay: returns `from + delta` when the destination is walkable, `from` otherwise.
    pub fn resolve_move(&self, from: Vec2, delta: Vec2) -> Vec2 {
        let target = from + delta;
        if self.can_move_to(target.x, target.y) {
            target
        } else {
            from
        }
    }
}
