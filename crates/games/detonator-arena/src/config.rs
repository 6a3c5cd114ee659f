use serde::{Deserialize, Serialize};

/// Minimum number of competing players.
pub const MIN_PLAYERS: usize = 2;
/// Maximum number of competing players (one per spawn corner).
pub const MAX_PLAYERS: usize = 4;
/// Largest arena side in tiles.
pub const MAX_GRID_SIZE: i32 = 255;

/// Data-driven configuration for a Detonator match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetonatorConfig {
    /// Arena width in tiles (odd, 5..=255).
    pub grid_width: i32,
    /// Arena height in tiles (odd, 5..=255).
    pub grid_height: i32,
    /// Bomb fuse length (seconds).
    pub bomb_timer: f32,
    /// How long an explosion stays live (seconds).
    pub explosion_duration: f32,
    /// Chance a destroyed soft block leaves a power-up behind.
    pub powerup_spawn_chance: f64,
    /// How long an uncollected power-up stays on the floor (seconds).
    pub powerup_lifetime: f32,
    /// Round duration (seconds). Reaching zero kills everyone still standing.
    pub round_time: f32,
    /// Round wins needed to take the match.
    pub rounds_to_win: u32,
    /// Number of competing players (2..=4).
    pub player_count: usize,
    pub default_bombs: u32,
    pub max_bombs: u32,
    pub default_fire: u32,
    pub max_fire: u32,
    /// Movement speed baseline (tiles/s).
    pub default_speed: f32,
    /// Movement speed ceiling (tiles/s).
    pub max_speed: f32,
    /// Speed gained per SpeedUp pickup (tiles/s).
    pub speed_step: f32,
    /// Step applied by a single move command (seconds).
    pub move_step: f32,
    /// Inset of the player footprint from each tile edge.
    pub hitbox_margin: f32,
    /// Seed for terrain drop randomness.
    pub seed: u64,
}

impl Default for DetonatorConfig {
    fn default() -> Self {
        Self {
            grid_width: 15,
            grid_height: 13,
            bomb_timer: 3.0,
            explosion_duration: 0.5,
            powerup_spawn_chance: 0.3,
            powerup_lifetime: 10.0,
            round_time: 180.0,
            rounds_to_win: 3,
            player_count: 2,
            default_bombs: 1,
            max_bombs: 8,
            default_fire: 2,
            max_fire: 8,
            default_speed: 3.0,
            max_speed: 6.0,
            speed_step: 1.0,
            move_step: 1.0 / 60.0,
            hitbox_margin: 0.2,
            seed: 0,
        }
    }
}

impl DetonatorConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("DETONATOR_CONFIG")
            .unwrap_or_else(|_| "config/detonator.toml".to_string());
        Self::load_from(&path)
    }

    /// Load config from the TOML file at `path`, falling back to defaults.
    pub fn load_from(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<DetonatorConfig>(&content) {
                Ok(cfg) => cfg.normalized(),
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    DetonatorConfig::default()
                },
            },
            Err(_) => DetonatorConfig::default(),
        }
    }

    /// Clamp every field into a range the simulation can run with.
    pub fn normalized(mut self) -> Self {
        self.grid_width = odd_grid_size(self.grid_width);
        self.grid_height = odd_grid_size(self.grid_height);
        self.player_count = self.player_count.clamp(MIN_PLAYERS, MAX_PLAYERS);
        self.rounds_to_win = self.rounds_to_win.max(1);
        self.powerup_spawn_chance = if self.powerup_spawn_chance.is_finite() {
            self.powerup_spawn_chance.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.bomb_timer = positive_or(self.bomb_timer, 3.0);
        self.explosion_duration = positive_or(self.explosion_duration, 0.5);
        self.powerup_lifetime = positive_or(self.powerup_lifetime, 10.0);
        self.round_time = positive_or(self.round_time, 180.0);
        self.move_step = positive_or(self.move_step, 1.0 / 60.0);
        self.default_speed = positive_or(self.default_speed, 3.0);
        self.max_speed = positive_or(self.max_speed, 6.0).max(self.default_speed);
        self.speed_step = positive_or(self.speed_step, 1.0);
        self.default_bombs = self.default_bombs.max(1);
        self.max_bombs = self.max_bombs.max(self.default_bombs);
        self.default_fire = self.default_fire.max(1);
        self.max_fire = self.max_fire.max(self.default_fire);
        self.hitbox_margin = if self.hitbox_margin.is_finite() {
            self.hitbox_margin.clamp(0.0, 0.45)
        } else {
            0.2
        };
        self
    }
}

fn odd_grid_size(v: i32) -> i32 {
    let v = v.clamp(5, MAX_GRID_SIZE);
    if v % 2 == 0 { v + 1 } else { v }
}

fn positive_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() && v > 0.0 { v } else { fallback }
}
