use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use detonator_core::powerup::PowerUpKind;

use crate::GridPos;
use crate::config::{DetonatorConfig, MAX_GRID_SIZE};
use crate::powerups::PowerUpType;

/// Terrain classification of one arena cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Floor,
    HardWall,
    SoftBlock,
    /// Floor with a pickup lying on it.
    PowerUp,
    /// Floor occupied by a live bomb.
    Bomb,
}

/// Offsets cleared around each spawn point (center plus 4 orthogonal neighbors).
const SPAWN_CLEARANCE: [(i32, i32); 5] = [(0, 0), (1, 0), (0, 1), (-1, 0), (0, -1)];

/// The tile grid, stored row-major (`y * width + x`).
#[derive(Debug, Clone)]
pub struct Arena {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    powerup_spawn_chance: f64,
    seed: u64,
    generation: u64,
    rng: StdRng,
}

impl Arena {
    /// Generate a fresh arena. `powerup_spawn_chance` is clamped to `[0, 1]`.
    pub fn new(width: i32, height: i32, powerup_spawn_chance: f64, seed: u64) -> Self {
        let width = width.clamp(3, MAX_GRID_SIZE);
        let height = height.clamp(3, MAX_GRID_SIZE);
        let powerup_spawn_chance = if powerup_spawn_chance.is_finite() {
            powerup_spawn_chance.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mut arena = Self {
            width,
            height,
            tiles: vec![Tile::Floor; (width * height) as usize],
            powerup_spawn_chance,
            seed,
            generation: 0,
            rng: round_rng(seed, 0),
        };
        arena.generate();
        arena
    }

    pub fn from_config(config: &DetonatorConfig) -> Self {
        Self::new(
            config.grid_width,
            config.grid_height,
            config.powerup_spawn_chance,
            config.seed,
        )
    }

    fn generate(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = self.index(x, y);
                self.tiles[idx] = self.initial_tile(x, y);
            }
        }
        for spawn in self.spawn_points() {
            for (dx, dy) in SPAWN_CLEARANCE {
                let (x, y) = (spawn.x + dx, spawn.y + dy);
                if self.get_tile(x, y) == Tile::SoftBlock {
                    self.set_tile(x, y, Tile::Floor);
                }
            }
        }
    }

    fn initial_tile(&self, x: i32, y: i32) -> Tile {
        let border = x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1;
        let pillar = x % 2 == 0 && y % 2 == 0;
        if border || pillar {
            Tile::HardWall
        } else {
            Tile::SoftBlock
        }
    }

    /// Regenerate the whole grid. Terrain drops after a reset draw from a
    /// fresh stream derived from the seed and the reset count.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.rng = round_rng(self.seed, self.generation);
        self.generate();
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    pub fn is_valid_position(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Tile at `(x, y)`. Anything outside the grid reads as a hard wall.
    pub fn get_tile(&self, x: i32, y: i32) -> Tile {
        if !self.is_valid_position(x, y) {
            return Tile::HardWall;
        }
        self.tiles[self.index(x, y)]
    }

    /// Overwrite a tile. Out-of-bounds writes are ignored.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        if self.is_valid_position(x, y) {
            let idx = self.index(x, y);
            self.tiles[idx] = tile;
        }
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        matches!(self.get_tile(x, y), Tile::Floor | Tile::PowerUp)
    }

    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        matches!(
            self.get_tile(x, y),
            Tile::HardWall | Tile::SoftBlock | Tile::Bomb
        )
    }

    pub fn is_destructible(&self, x: i32, y: i32) -> bool {
        self.get_tile(x, y) == Tile::SoftBlock
    }

    /// Destroy a soft block. Returns the power-up it drops, if any.
    /// Anything other than a soft block is left alone.
    pub fn destroy_block(&mut self, x: i32, y: i32) -> Option<PowerUpType> {
        if !self.is_destructible(x, y) {
            return None;
        }
        if self.rng.random_bool(self.powerup_spawn_chance) {
            self.set_tile(x, y, Tile::PowerUp);
            Some(PowerUpType::random(&mut self.rng))
        } else {
            self.set_tile(x, y, Tile::Floor);
            None
        }
    }

    /// Copy of the grid as rows (`grid[y][x]`).
    pub fn grid(&self) -> Vec<Vec<Tile>> {
        self.tiles
            .chunks(self.width as usize)
            .map(|row| row.to_vec())
            .collect()
    }

    /// The four inner corners, in player slot order.
    pub fn spawn_points(&self) -> Vec<GridPos> {
        let (right, bottom) = (self.width - 2, self.height - 2);
        vec![
            GridPos::new(1, 1),
            GridPos::new(right, 1),
            GridPos::new(1, bottom),
            GridPos::new(right, bottom),
        ]
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }
}

fn round_rng(seed: u64, generation: u64) -> StdRng {
    StdRng::seed_from_u64(seed ^ generation.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}
