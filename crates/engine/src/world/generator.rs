use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::terrain::{TerrainError, TerrainMap, Tile, TileType};

pub const DEFAULT_FREQUENCY: f32 = 0.08;
pub const DEFAULT_THRESHOLD: f32 = 0.0;
pub const DEFAULT_CELL_SIZE: f32 = 1.0;

const LATTICE_SIZE: usize = 256;
const LATTICE_MASK: i32 = 255;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainGenerator {
    seed: i32,
    frequency: f32,
    threshold: f32,
}

impl TerrainGenerator {
    pub fn new(seed: i32) -> Self {
        Self::with_params(seed, DEFAULT_FREQUENCY, DEFAULT_THRESHOLD)
    }

    pub fn with_params(seed: i32, frequency: f32, threshold: f32) -> Self {
        Self {
            seed,
            frequency,
            threshold,
        }
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    pub fn generate(&self, width: u32, height: u32) -> Result<TerrainMap, TerrainError> {
        let mut map = TerrainMap::new(width, height, DEFAULT_CELL_SIZE)?;
        let noise = GradientNoise::new(self.seed);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let value = noise.sample(x as f32 * self.frequency, y as f32 * self.frequency);
                let kind = if value > self.threshold {
                    TileType::Ground
                } else {
                    TileType::Blocked
                };
                map.set_tile(x, y, Tile::new(kind, value));
            }
        }

        debug!(
            seed = self.seed,
            width,
            height,
            walkable = map.walkable_count(),
            "terrain_generated"
        );
        Ok(map)
    }
}

pub fn generate(seed: i32, width: u32, height: u32) -> Result<TerrainMap, TerrainError> {
    TerrainGenerator::new(seed).generate(width, height)
}

/// 2D gradient noise over a 256-cell lattice that wraps, so it stays continuous across cells.
#[derive(Debug, Clone)]
pub(crate) struct GradientNoise {
    gradients: [(f32, f32); LATTICE_SIZE],
    permutation: [u8; LATTICE_SIZE],
}

impl GradientNoise {
    pub(crate) fn new(seed: i32) -> Self {
        let mut rng = StdRng::seed_from_u64(seed as i64 as u64);

        let mut gradients = [(0.0, 0.0); LATTICE_SIZE];
        for gradient in gradients.iter_mut() {
            let angle = rng.gen::<f32>() * TAU;
            *gradient = (angle.cos(), angle.sin());
        }

        let mut permutation = [0u8; LATTICE_SIZE];
        for (index, slot) in permutation.iter_mut().enumerate() {
            *slot = index as u8;
        }
        for i in (1..LATTICE_SIZE).rev() {
            let swap = rng.gen_range(0..=i);
            permutation.swap(i, swap);
        }

        Self {
            gradients,
            permutation,
        }
    }

    pub(crate) fn sample(&self, x: f32, y: f32) -> f32 {
        let x_floor = x.floor();
        let y_floor = y.floor();
        let xi = x_floor as i32 & LATTICE_MASK;
        let yi = y_floor as i32 & LATTICE_MASK;
        let xf = x - x_floor;
        let yf = y - y_floor;

        let bottom_left = self.gradient_dot(xi, yi, xf, yf);
        let bottom_right = self.gradient_dot(xi + 1, yi, xf - 1.0, yf);
        let top_left = self.gradient_dot(xi, yi + 1, xf, yf - 1.0);
        let top_right = self.gradient_dot(xi + 1, yi + 1, xf - 1.0, yf - 1.0);

        let u = fade(xf);
        let v = fade(yf);
        let bottom = lerp(bottom_left, bottom_right, u);
        let top = lerp(top_left, top_right, u);
        lerp(bottom, top, v)
    }

    fn gradient_dot(&self, xi: i32, yi: i32, x: f32, y: f32) -> f32 {
        let (gx, gy) = self.gradients[self.hash(xi, yi)];
        gx * x + gy * y
    }

    fn hash(&self, x: i32, y: i32) -> usize {
        let row = self.permutation[(y & LATTICE_MASK) as usize] as i32;
        self.permutation[((x + row) & LATTICE_MASK) as usize] as usize
    }
}

fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_generates_identical_maps() {
        let first = generate(1337, 10, 10).expect("terrain");
        let second = generate(1337, 10, 10).expect("terrain");

        let first_bits: Vec<(TileType, u32)> = first
            .tiles()
            .iter()
            .map(|tile| (tile.kind, tile.height.to_bits()))
            .collect();
        let second_bits: Vec<(TileType, u32)> = second
            .tiles()
            .iter()
            .map(|tile| (tile.kind, tile.height.to_bits()))
            .collect();
        assert_eq!(first_bits, second_bits);
    }

    #[test]
    fn different_seeds_generate_different_maps() {
        let first = generate(1, 32, 32).expect("terrain");
        let second = generate(2, 32, 32).expect("terrain");
        assert_ne!(first, second);
    }

    #[test]
    fn classification_follows_threshold() {
        let map = TerrainGenerator::with_params(7, 0.13, 0.1)
            .generate(24, 24)
            .expect("terrain");
        for tile in map.tiles() {
            assert_eq!(tile.is_walkable(), tile.height > 0.1);
        }
    }

    #[test]
    fn noise_is_zero_on_lattice_points() {
        let noise = GradientNoise::new(99);
        for i in -3..300 {
            assert_eq!(noise.sample(i as f32, (i * 7) as f32), 0.0);
        }
    }

    #[test]
    fn noise_is_continuous_across_cell_boundaries() {
        let noise = GradientNoise::new(42);
        let epsilon = 1e-3;
        for boundary in [1.0f32, 17.0, 255.0, 256.0, 300.0] {
            let before = noise.sample(boundary - epsilon, 3.4);
            let after = noise.sample(boundary + epsilon, 3.4);
            assert!((before - after).abs() < 0.01, "jump at x={boundary}");
        }
    }

    #[test]
    fn noise_stays_in_expected_range() {
        let noise = GradientNoise::new(5);
        for y in 0..64 {
            for x in 0..64 {
                let value = noise.sample(x as f32 * 0.37, y as f32 * 0.37);
                assert!((-1.0..=1.0).contains(&value));
            }
        }
    }

    #[test]
    fn invalid_dimensions_surface_as_error() {
        assert!(generate(1, 0, 10).is_err());
    }
}
