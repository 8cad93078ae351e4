use thiserror::Error;

pub const MAX_TERRAIN_SIDE: u32 = 4096;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TileType {
    #[default]
    Unknown,
    Ground,
    Blocked,
    Water,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tile {
    pub kind: TileType,
    pub height: f32,
}

impl Tile {
    pub const fn new(kind: TileType, height: f32) -> Self {
        Self { kind, height }
    }

    pub const fn unknown() -> Self {
        Self::new(TileType::Unknown, 0.0)
    }

    pub fn is_walkable(&self) -> bool {
        self.kind == TileType::Ground
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TerrainError {
    #[error("terrain dimensions must be within 1..={max} per side, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32, max: u32 },
    #[error("cell size must be finite and positive, got {0}")]
    InvalidCellSize(f32),
    #[error("tile count mismatch: expected {expected}, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },
}

/// Row-major grid of tiles: tile (x, y) lives at `y * width + x`.
/// Tile (x, y) covers world `[x, x + 1) * cell_size` by `[y, y + 1) * cell_size`.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMap {
    width: u32,
    height: u32,
    cell_size: f32,
    tiles: Vec<Tile>,
}

impl TerrainMap {
    pub fn new(width: u32, height: u32, cell_size: f32) -> Result<Self, TerrainError> {
        validate_dimensions(width, height)?;
        let count = width as usize * height as usize;
        Self::from_tiles(width, height, cell_size, vec![Tile::unknown(); count])
    }

    pub fn from_tiles(
        width: u32,
        height: u32,
        cell_size: f32,
        tiles: Vec<Tile>,
    ) -> Result<Self, TerrainError> {
        validate_dimensions(width, height)?;
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(TerrainError::InvalidCellSize(cell_size));
        }
        let expected = width as usize * height as usize;
        let actual = tiles.len();
        if expected != actual {
            return Err(TerrainError::TileCountMismatch { expected, actual });
        }
        Ok(Self {
            width,
            height,
            cell_size,
            tiles,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<Tile> {
        self.index_of(x, y)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Out-of-range writes are ignored and report `false`.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) -> bool {
        match self.index_of(x, y) {
            Some(index) => {
                self.tiles[index] = tile;
                true
            }
            None => false,
        }
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_some_and(|tile| tile.is_walkable())
    }

    /// Height under a world position. Coordinates outside the map clamp to the nearest edge tile.
    pub fn height_at_world(&self, world_x: f32, world_y: f32) -> f32 {
        let x = clamp_to_axis(world_x / self.cell_size, self.width);
        let y = clamp_to_axis(world_y / self.cell_size, self.height);
        self.tiles[y as usize * self.width as usize + x as usize].height
    }

    pub fn walkable_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_walkable()).count()
    }

    /// Nearest walkable tile to `(x, y)` by square rings of growing radius.
    pub fn find_walkable_near(&self, x: i32, y: i32) -> Option<(i32, i32)> {
        if self.is_walkable(x, y) {
            return Some((x, y));
        }
        let max_radius = self.width.max(self.height) as i32;
        for radius in 1..=max_radius {
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    if dx.abs() != radius && dy.abs() != radius {
                        continue;
                    }
                    if self.is_walkable(x + dx, y + dy) {
                        return Some((x + dx, y + dy));
                    }
                }
            }
        }
        None
    }
}

fn validate_dimensions(width: u32, height: u32) -> Result<(), TerrainError> {
    if width == 0 || height == 0 || width > MAX_TERRAIN_SIDE || height > MAX_TERRAIN_SIDE {
        return Err(TerrainError::InvalidDimensions {
            width,
            height,
            max: MAX_TERRAIN_SIDE,
        });
    }
    Ok(())
}

fn clamp_to_axis(grid_coord: f32, len: u32) -> u32 {
    if !grid_coord.is_finite() || grid_coord <= 0.0 {
        return 0;
    }
    (grid_coord.floor() as u32).min(len - 1)
}
