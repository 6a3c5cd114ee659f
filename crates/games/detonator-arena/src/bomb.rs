use serde::{Deserialize, Serialize};

use detonator_core::game_trait::PlayerId;
use detonator_core::time::Countdown;

use crate::arena::{Arena, Tile};
use crate::powerups::PowerUpType;
use crate::{Direction, GridPos};

/// Share of an explosion's lifetime spent expanding.
const EXPAND_END: f32 = 0.15;
/// Share of an explosion's lifetime after which it starts fading.
const FADE_START: f32 = 0.7;

/// A placed bomb counting down to detonation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bomb {
    pub position: GridPos,
    pub owner: PlayerId,
    pub range: u32,
    timer: Countdown,
    exploded: bool,
    reported: bool,
}

impl Bomb {
    pub fn new(position: GridPos, owner: PlayerId, range: u32, fuse: f32) -> Self {
        Self {
            position,
            owner,
            range,
            timer: Countdown::new(fuse),
            exploded: false,
            reported: false,
        }
    }

    /// Advance the fuse. Returns true on exactly one call: the one where the
    /// fuse runs out, or the first call after [`Bomb::force_explode`].
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.exploded && self.timer.tick(dt) {
            self.exploded = true;
        }
        if self.exploded && !self.reported {
            self.reported = true;
            return true;
        }
        false
    }

    /// Detonate immediately, e.g. when caught in another blast.
    pub fn force_explode(&mut self) {
        self.exploded = true;
        self.timer.expire();
    }

    pub fn exploded(&self) -> bool {
        self.exploded
    }

    pub fn time_remaining(&self) -> f32 {
        self.timer.remaining()
    }

    /// Burnt share of the fuse in `[0, 1]`.
    pub fn fuse_fraction(&self) -> f32 {
        self.timer.progress()
    }
}

/// Render-facing stage of an explosion's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionPhase {
    Expand,
    Full,
    Fade,
}

/// A live blast. Its tiles are fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub center: GridPos,
    tiles: Vec<GridPos>,
    timer: Countdown,
}

impl Explosion {
    /// Raycast the blast from `center` through the arena as it is right now.
    pub fn new(center: GridPos, range: u32, arena: &Arena, duration: f32) -> Self {
        Self {
            center,
            tiles: blast_tiles(center, range, arena),
            timer: Countdown::new(duration),
        }
    }

    pub fn tiles(&self) -> &[GridPos] {
        &self.tiles
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.tiles.contains(&pos)
    }

    /// Returns true once the explosion has burnt out.
    pub fn update(&mut self, dt: f32) -> bool {
        self.timer.tick(dt)
    }

    pub fn is_finished(&self) -> bool {
        self.timer.is_expired()
    }

    pub fn time_remaining(&self) -> f32 {
        self.timer.remaining()
    }

    /// Elapsed share of the lifetime in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.timer.progress()
    }

    pub fn phase(&self) -> ExplosionPhase {
        let p = self.progress();
        if p < EXPAND_END {
            ExplosionPhase::Expand
        } else if p < FADE_START {
            ExplosionPhase::Full
        } else {
            ExplosionPhase::Fade
        }
    }

    /// Grows 0 -> 1 while expanding, holds, then shrinks back to 0.
    pub fn scale(&self) -> f32 {
        let p = self.progress();
        match self.phase() {
            ExplosionPhase::Expand => p / EXPAND_END,
            ExplosionPhase::Full => 1.0,
            ExplosionPhase::Fade => fade_out(p),
        }
    }

    pub fn opacity(&self) -> f32 {
        match self.phase() {
            ExplosionPhase::Expand | ExplosionPhase::Full => 1.0,
            ExplosionPhase::Fade => fade_out(self.progress()),
        }
    }
}

fn fade_out(progress: f32) -> f32 {
    (1.0 - (progress - FADE_START) / (1.0 - FADE_START)).clamp(0.0, 1.0)
}

/// Center plus up to `range` cells each way. Hard walls stop the ray and are
/// excluded; the first soft block is included and stops the ray.
fn blast_tiles(center: GridPos, range: u32, arena: &Arena) -> Vec<GridPos> {
    let mut tiles = Vec::with_capacity(1 + 4 * range as usize);
    tiles.push(center);
    for direction in Direction::CARDINAL {
        for step in 1..=range as i32 {
            let pos = center.offset(direction, step);
            match arena.get_tile(pos.x, pos.y) {
                Tile::HardWall => break,
                Tile::SoftBlock => {
                    tiles.push(pos);
                    break;
                },
                Tile::Floor | Tile::PowerUp | Tile::Bomb => tiles.push(pos),
            }
        }
    }
    tiles
}

/// Everything one [`BombManager::update`] call produced.
#[derive(Debug, Clone, Default)]
pub struct BombTickResult {
    pub exploded: Vec<Bomb>,
    /// Soft blocks destroyed this tick.
    pub destroyed: Vec<GridPos>,
    /// Pickups dropped by the destroyed blocks.
    pub powerups: Vec<(GridPos, PowerUpType)>,
    pub finished: Vec<Explosion>,
}

/// Owns live bombs and explosions and resolves chain reactions.
#[derive(Debug, Clone)]
pub struct BombManager {
    bombs: Vec<Bomb>,
    explosions: Vec<Explosion>,
    bomb_timer: f32,
    explosion_duration: f32,
}

impl BombManager {
    pub fn new(bomb_timer: f32, explosion_duration: f32) -> Self {
        Self {
            bombs: Vec::new(),
            explosions: Vec::new(),
            bomb_timer,
            explosion_duration,
        }
    }

    /// Copy of the live bombs.
    pub fn bombs(&self) -> Vec<Bomb> {
        self.bombs.clone()
    }

    /// Copy of the live explosions.
    pub fn explosions(&self) -> Vec<Explosion> {
        self.explosions.clone()
    }

    /// Place a bomb. Fails if a live bomb already sits on that cell.
    pub fn place_bomb(&mut self, position: GridPos, owner: PlayerId, range: u32) -> bool {
        if self.bomb_at(position).is_some() {
            return false;
        }
        self.bombs
            .push(Bomb::new(position, owner, range, self.bomb_timer));
        true
    }

    /// Advance one tick.
    ///
    /// 1. Bombs inside explosions that were live before this tick are forced.
    /// 2. Fuses advance; every exploded bomb leaves the live set and its blast
    ///    is raycast against the arena as it stands.
    /// 3. Soft blocks under the new blasts are destroyed.
    /// 4. Explosion timers advance and burnt-out explosions are removed.
    ///
    /// A bomb caught by a blast created in step 2 is only forced on the next
    /// tick, so cascades propagate one tick per link.
    pub fn update(&mut self, dt: f32, arena: &mut Arena) -> BombTickResult {
        let mut result = BombTickResult::default();

        for bomb in &mut self.bombs {
            if !bomb.exploded() && self.explosions.iter().any(|e| e.contains(bomb.position)) {
                tracing::trace!(x = bomb.position.x, y = bomb.position.y, "Chain detonation");
                bomb.force_explode();
            }
        }

        let first_new = self.explosions.len();
        let mut remaining = Vec::with_capacity(self.bombs.len());
        for mut bomb in std::mem::take(&mut self.bombs) {
            if !bomb.update(dt) {
                remaining.push(bomb);
                continue;
            }
            tracing::trace!(
                owner = bomb.owner,
                x = bomb.position.x,
                y = bomb.position.y,
                range = bomb.range,
                "Bomb detonated"
            );
            if arena.get_tile(bomb.position.x, bomb.position.y) == Tile::Bomb {
                arena.set_tile(bomb.position.x, bomb.position.y, Tile::Floor);
            }
            self.explosions.push(Explosion::new(
                bomb.position,
                bomb.range,
                arena,
                self.explosion_duration,
            ));
            result.exploded.push(bomb);
        }
        self.bombs = remaining;

        for explosion in &self.explosions[first_new..] {
            for &tile in explosion.tiles() {
                if !arena.is_destructible(tile.x, tile.y) {
                    continue;
                }
                let drop = arena.destroy_block(tile.x, tile.y);
                result.destroyed.push(tile);
                if let Some(kind) = drop {
                    result.powerups.push((tile, kind));
                }
            }
        }

        let mut live = Vec::with_capacity(self.explosions.len());
        for mut explosion in std::mem::take(&mut self.explosions) {
            if explosion.update(dt) {
                result.finished.push(explosion);
            } else {
                live.push(explosion);
            }
        }
        self.explosions = live;

        result
    }

    pub fn bomb_at(&self, position: GridPos) -> Option<&Bomb> {
        self.bombs.iter().find(|b| b.position == position)
    }

    pub fn is_explosion(&self, x: i32, y: i32) -> bool {
        let pos = GridPos::new(x, y);
        self.explosions.iter().any(|e| e.contains(pos))
    }

    pub fn clear(&mut self) {
        self.bombs.clear();
        self.explosions.clear();
    }

    pub fn bomb_count(&self) -> usize {
        self.bombs.len()
    }

    pub fn explosion_count(&self) -> usize {
        self.explosions.len()
    }
}
