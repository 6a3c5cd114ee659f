use serde::{Deserialize, Serialize};

use detonator_core::game_trait::PlayerId;
use detonator_core::player::PlayerColor;
use detonator_core::time::sanitize_dt;

use crate::arena::Arena;
use crate::config::DetonatorConfig;
use crate::powerups::PowerUpType;
use crate::{Direction, GridPos};

/// Frames in the walk cycle.
pub const WALK_FRAMES: u8 = 4;
/// Seconds per walk frame.
pub const WALK_FRAME_TIME: f32 = 0.1;
/// Length of the death animation (seconds).
pub const DEATH_DURATION: f32 = 0.3;

/// Per-round combat stats, plus the match-long win tally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub bomb_capacity: u32,
    pub fire_range: u32,
    /// Tiles per second.
    pub speed: f32,
    pub wins: u32,
}

/// Stat baselines, ceilings and footprint size shared by every player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerTuning {
    pub default_bombs: u32,
    pub max_bombs: u32,
    pub default_fire: u32,
    pub max_fire: u32,
    pub default_speed: f32,
    pub max_speed: f32,
    pub speed_step: f32,
    pub hitbox_margin: f32,
}

impl PlayerTuning {
    pub fn from_config(config: &DetonatorConfig) -> Self {
        Self {
            default_bombs: config.default_bombs,
            max_bombs: config.max_bombs,
            default_fire: config.default_fire,
            max_fire: config.max_fire,
            default_speed: config.default_speed,
            max_speed: config.max_speed,
            speed_step: config.speed_step,
            hitbox_margin: config.hitbox_margin,
        }
    }

    fn baseline(&self, wins: u32) -> PlayerStats {
        PlayerStats {
            bomb_capacity: self.default_bombs,
            fire_range: self.default_fire,
            speed: self.default_speed,
            wins,
        }
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self::from_config(&DetonatorConfig::default())
    }
}

/// One combatant. `(x, y)` is the top-left of its tile-sized square; the
/// collision footprint is that square inset by `hitbox_margin` on every side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub x: f32,
    pub y: f32,
    pub direction: Direction,
    pub alive: bool,
    pub stats: PlayerStats,
    pub active_bombs: u32,
    pub color: PlayerColor,
    pub is_moving: bool,
    pub anim_frame: u8,
    anim_timer: f32,
    death_timer: f32,
    tuning: PlayerTuning,
}

impl Player {
    pub fn new(id: PlayerId, spawn: GridPos, tuning: PlayerTuning) -> Self {
        Self {
            id,
            x: spawn.x as f32,
            y: spawn.y as f32,
            direction: Direction::None,
            alive: true,
            stats: tuning.baseline(0),
            active_bombs: 0,
            color: PlayerColor::for_slot(id as usize),
            is_moving: false,
            anim_frame: 0,
            anim_timer: 0.0,
            death_timer: 0.0,
            tuning,
        }
    }

    /// Cell used for bombs, pickups and blast checks.
    pub fn grid_position(&self) -> GridPos {
        GridPos::new((self.x + 0.5).floor() as i32, (self.y + 0.5).floor() as i32)
    }

    /// Try to move `speed * dt` along `direction`. The step either fully
    /// succeeds or leaves the player where it was. Returns true if it moved.
    pub fn move_in(&mut self, direction: Direction, arena: &Arena, dt: f32) -> bool {
        if !self.alive || direction == Direction::None {
            self.is_moving = false;
            return false;
        }
        self.direction = direction;

        let distance = self.stats.speed * sanitize_dt(dt);
        let (dx, dy) = direction.delta();
        let nx = self.x + dx as f32 * distance;
        let ny = self.y + dy as f32 * distance;
        if !self.can_occupy(nx, ny, arena) {
            self.is_moving = false;
            return false;
        }
        self.x = nx;
        self.y = ny;
        self.is_moving = true;
        true
    }

    /// Every footprint corner must land on a non-solid cell.
    fn can_occupy(&self, x: f32, y: f32, arena: &Arena) -> bool {
        self.footprint_cells(x, y)
            .iter()
            .all(|cell| !arena.is_solid(cell.x, cell.y))
    }

    fn footprint_cells(&self, x: f32, y: f32) -> [GridPos; 4] {
        let m = self.tuning.hitbox_margin;
        let (left, right) = ((x + m).floor() as i32, (x + 1.0 - m).floor() as i32);
        let (top, bottom) = ((y + m).floor() as i32, (y + 1.0 - m).floor() as i32);
        [
            GridPos::new(left, top),
            GridPos::new(right, top),
            GridPos::new(left, bottom),
            GridPos::new(right, bottom),
        ]
    }

    /// Claim a bomb slot. Returns the cell to place it on, or `None` if the
    /// player is dead or every slot is in use.
    pub fn drop_bomb(&mut self) -> Option<GridPos> {
        if !self.alive || self.active_bombs >= self.stats.bomb_capacity {
            return None;
        }
        self.active_bombs += 1;
        Some(self.grid_position())
    }

    /// Give a bomb slot back.
    pub fn on_bomb_exploded(&mut self) {
        self.active_bombs = self.active_bombs.saturating_sub(1);
    }

    pub fn collect_powerup(&mut self, kind: PowerUpType) {
        let t = &self.tuning;
        match kind {
            PowerUpType::BombUp => {
                self.stats.bomb_capacity = (self.stats.bomb_capacity + 1).min(t.max_bombs);
            },
            PowerUpType::FireUp => {
                self.stats.fire_range = (self.stats.fire_range + 1).min(t.max_fire);
            },
            PowerUpType::SpeedUp => {
                self.stats.speed = (self.stats.speed + t.speed_step).min(t.max_speed);
            },
        }
    }

    pub fn die(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.is_moving = false;
        self.death_timer = 0.0;
    }

    pub fn add_win(&mut self) {
        self.stats.wins += 1;
    }

    /// Back to `spawn` with baseline stats. Wins carry over.
    pub fn reset(&mut self, spawn: GridPos) {
        self.x = spawn.x as f32;
        self.y = spawn.y as f32;
        self.direction = Direction::None;
        self.alive = true;
        self.stats = self.tuning.baseline(self.stats.wins);
        self.active_bombs = 0;
        self.is_moving = false;
        self.anim_frame = 0;
        self.anim_timer = 0.0;
        self.death_timer = 0.0;
    }

    /// Advance walk and death animations. Never touches simulation state.
    /// The walk cycle only continues while moves keep arriving between calls.
    pub fn update_animation(&mut self, dt: f32) {
        let dt = sanitize_dt(dt);
        if !self.alive {
            self.death_timer = (self.death_timer + dt).min(DEATH_DURATION);
            return;
        }
        if self.is_moving {
            self.anim_timer += dt;
            while self.anim_timer >= WALK_FRAME_TIME {
                self.anim_timer -= WALK_FRAME_TIME;
                self.anim_frame = (self.anim_frame + 1) % WALK_FRAMES;
            }
        } else {
            self.anim_frame = 0;
            self.anim_timer = 0.0;
        }
        self.is_moving = false;
    }

    /// Death animation progress in `[0, 1]`. Zero while alive.
    pub fn death_progress(&self) -> f32 {
        if self.alive {
            return 0.0;
        }
        (self.death_timer / DEATH_DURATION).clamp(0.0, 1.0)
    }
}
