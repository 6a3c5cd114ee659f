pub mod arena;
pub mod bomb;
pub mod config;
pub mod player;
pub mod powerups;
pub mod scoring;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use detonator_core::arena_game_snapshot;
use detonator_core::game_trait::{ArenaGame, GameEvent, GameMetadata, PlayerId, PlayerScore};
use detonator_core::time::sanitize_dt;

use arena::{Arena, Tile};
use bomb::{Bomb, BombManager, BombTickResult, Explosion};
use config::{DetonatorConfig, MAX_PLAYERS, MIN_PLAYERS};
use player::{Player, PlayerTuning};
use powerups::{PowerUp, PowerUpManager, PowerUpType};

/// Integer tile coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell `steps` tiles away along `direction`.
    pub fn offset(self, direction: Direction, steps: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx * steps, self.y + dy * steps)
    }
}

/// Movement command. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

impl Direction {
    pub const CARDINAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::None => (0, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Menu,
    Playing,
    Paused,
    RoundEnd,
    GameEnd,
}

/// Encoded input accepted by [`ArenaGame::apply_input`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaInput {
    pub direction: Direction,
    pub bomb: bool,
}

/// Everything one [`Game::update`] call produced, for audio and
/// leaderboard collaborators.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub bombs: BombTickResult,
    pub deaths: SmallVec<[PlayerId; MAX_PLAYERS]>,
    pub collected: SmallVec<[(PlayerId, PowerUpType); MAX_PLAYERS]>,
    /// Pickups destroyed by explosions.
    pub burned: Vec<GridPos>,
    /// Pickups whose lifetime ran out.
    pub expired: Vec<GridPos>,
    pub events: Vec<GameEvent>,
}

/// Serializable view of the whole simulation between ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub grid: Vec<Vec<Tile>>,
    pub spawn_points: Vec<GridPos>,
    pub bombs: Vec<Bomb>,
    pub explosions: Vec<Explosion>,
    pub powerups: Vec<PowerUp>,
    pub players: Vec<Player>,
    pub round_timer: f32,
    pub round_number: u32,
    pub state: GameState,
    pub round_winner: Option<PlayerId>,
    pub match_winner: Option<PlayerId>,
}

/// The Detonator match: one arena, its bombs and pickups, and 2-4 players.
pub struct Game {
    config: DetonatorConfig,
    arena: Arena,
    bombs: BombManager,
    powerups: PowerUpManager,
    players: Vec<Player>,
    round_timer: f32,
    round_number: u32,
    state: GameState,
    round_winner: Option<PlayerId>,
    match_winner: Option<PlayerId>,
}

impl Game {
    pub fn new() -> Self {
        Self::with_config(DetonatorConfig::load())
    }

    pub fn with_config(config: DetonatorConfig) -> Self {
        let config = config.normalized();
        let arena = Arena::from_config(&config);
        let players = spawn_players(&config, &arena);
        Self {
            bombs: BombManager::new(config.bomb_timer, config.explosion_duration),
            powerups: PowerUpManager::new(config.powerup_lifetime),
            round_timer: config.round_time,
            round_number: 1,
            state: GameState::Menu,
            round_winner: None,
            match_winner: None,
            arena,
            players,
            config,
        }
    }

    pub fn config(&self) -> &DetonatorConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn grid(&self) -> Vec<Vec<Tile>> {
        self.arena.grid()
    }

    pub fn spawn_points(&self) -> Vec<GridPos> {
        self.arena.spawn_points()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn alive_player_count(&self) -> usize {
        self.players.iter().filter(|p| p.alive).count()
    }

    pub fn bombs(&self) -> Vec<Bomb> {
        self.bombs.bombs()
    }

    pub fn explosions(&self) -> Vec<Explosion> {
        self.bombs.explosions()
    }

    pub fn powerups(&self) -> Vec<PowerUp> {
        self.powerups.powerups()
    }

    pub fn bomb_at(&self, position: GridPos) -> Option<Bomb> {
        self.bombs.bomb_at(position).cloned()
    }

    pub fn is_explosion(&self, x: i32, y: i32) -> bool {
        self.bombs.is_explosion(x, y)
    }

    /// Seconds left in the current round, never negative.
    pub fn round_timer(&self) -> f32 {
        self.round_timer
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn rounds_to_win(&self) -> u32 {
        self.config.rounds_to_win
    }

    /// Winner of the last finished round. `None` for a draw or while playing.
    pub fn round_winner(&self) -> Option<PlayerId> {
        self.round_winner
    }

    pub fn match_winner(&self) -> Option<PlayerId> {
        self.match_winner
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            grid: self.arena.grid(),
            spawn_points: self.arena.spawn_points(),
            bombs: self.bombs.bombs(),
            explosions: self.bombs.explosions(),
            powerups: self.powerups.powerups(),
            players: self.players.clone(),
            round_timer: self.round_timer,
            round_number: self.round_number,
            state: self.state,
            round_winner: self.round_winner,
            match_winner: self.match_winner,
        }
    }

    /// Leave the menu and start the first round.
    pub fn start(&mut self) {
        if self.state == GameState::Menu {
            self.state = GameState::Playing;
        }
    }

    pub fn pause(&mut self) {
        if self.state == GameState::Playing {
            self.state = GameState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == GameState::Paused {
            self.state = GameState::Playing;
        }
    }

    /// Regenerate the arena and respawn everyone. Only valid from `RoundEnd`.
    pub fn next_round(&mut self) {
        if self.state != GameState::RoundEnd {
            return;
        }
        self.begin_round();
        self.round_number += 1;
        self.state = GameState::Playing;
    }

    /// Back to the menu with fresh players. Wins are wiped.
    pub fn reset(&mut self) {
        self.players = spawn_players(&self.config, &self.arena);
        self.begin_round();
        self.round_number = 1;
        self.match_winner = None;
        self.state = GameState::Menu;
    }

    fn begin_round(&mut self) {
        self.arena.reset();
        self.bombs.clear();
        self.powerups.clear();
        self.round_timer = self.config.round_time;
        self.round_winner = None;
        let spawns = self.arena.spawn_points();
        for (player, spawn) in self.players.iter_mut().zip(spawns) {
            player.reset(spawn);
        }
    }

    /// Apply one fixed move step for a live player. Ignored outside `Playing`.
    pub fn move_player(&mut self, id: PlayerId, direction: Direction) {
        if self.state != GameState::Playing {
            return;
        }
        let step = self.config.move_step;
        if let Some(player) = self.players.iter_mut().find(|p| p.id == id && p.alive) {
            player.move_in(direction, &self.arena, step);
        }
    }

    /// Drop a bomb at the player's cell. Returns false if nothing was placed.
    pub fn place_bomb(&mut self, id: PlayerId) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(player) = self.players.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        let Some(position) = player.drop_bomb() else {
            return false;
        };
        if !self.bombs.place_bomb(position, id, player.stats.fire_range) {
            player.on_bomb_exploded();
            return false;
        }
        self.arena.set_tile(position.x, position.y, Tile::Bomb);
        true
    }

    /// Advance the simulation. Only `Playing` runs the simulation; animations
    /// keep going after a round ends.
    pub fn update(&mut self, dt: f32) -> TickReport {
        let dt = sanitize_dt(dt);
        let mut report = TickReport::default();
        match self.state {
            GameState::Playing => self.step(dt, &mut report),
            GameState::RoundEnd | GameState::GameEnd => {},
            GameState::Menu | GameState::Paused => return report,
        }
        for player in &mut self.players {
            player.update_animation(dt);
        }
        report
    }

    fn step(&mut self, dt: f32, report: &mut TickReport) {
        self.round_timer -= dt;
        if self.round_timer <= 0.0 {
            self.round_timer = 0.0;
            for player in self.players.iter_mut().filter(|p| p.alive) {
                player.die();
                report.deaths.push(player.id);
                report.events.push(GameEvent::PlayerEliminated {
                    player_id: player.id,
                });
            }
            tracing::debug!(round = self.round_number, "Round timer expired");
            self.end_round(None, report);
            return;
        }

        report.bombs = self.bombs.update(dt, &mut self.arena);
        for bomb in &report.bombs.exploded {
            if let Some(owner) = self.player_mut(bomb.owner) {
                owner.on_bomb_exploded();
            }
        }
        for &(position, kind) in &report.bombs.powerups {
            self.powerups.spawn(position, kind);
        }

        let burned: Vec<GridPos> = self
            .powerups
            .iter()
            .map(|pu| pu.position)
            .filter(|pos| self.bombs.is_explosion(pos.x, pos.y))
            .collect();
        for &pos in &burned {
            self.powerups.remove_at(pos);
            self.clear_pickup_marker(pos);
        }
        report.burned = burned;

        report.expired = self.powerups.update(dt);
        for &pos in &report.expired {
            self.clear_pickup_marker(pos);
        }

        for player in self.players.iter_mut().filter(|p| p.alive) {
            let cell = player.grid_position();
            if self.bombs.is_explosion(cell.x, cell.y) {
                player.die();
                report.deaths.push(player.id);
                report.events.push(GameEvent::PlayerEliminated {
                    player_id: player.id,
                });
            }
        }

        for player in self.players.iter_mut().filter(|p| p.alive) {
            let cell = player.grid_position();
            if let Some(kind) = self.powerups.collect(cell) {
                player.collect_powerup(kind);
                report.collected.push((player.id, kind));
                if self.arena.get_tile(cell.x, cell.y) == Tile::PowerUp {
                    self.arena.set_tile(cell.x, cell.y, Tile::Floor);
                }
            }
        }

        let survivors: SmallVec<[PlayerId; MAX_PLAYERS]> = self
            .players
            .iter()
            .filter(|p| p.alive)
            .map(|p| p.id)
            .collect();
        if survivors.len() <= 1 {
            self.end_round(survivors.first().copied(), report);
        }
    }

    /// Reset a pickup cell to floor unless something else took it over.
    fn clear_pickup_marker(&mut self, pos: GridPos) {
        if self.arena.get_tile(pos.x, pos.y) == Tile::PowerUp {
            self.arena.set_tile(pos.x, pos.y, Tile::Floor);
        }
    }

    fn end_round(&mut self, winner: Option<PlayerId>, report: &mut TickReport) {
        self.round_winner = winner;
        report.events.push(GameEvent::RoundComplete { winner });

        let threshold = self.config.rounds_to_win;
        let wins = winner.and_then(|id| {
            let player = self.player_mut(id)?;
            player.add_win();
            Some(player.stats.wins)
        });
        if let (Some(id), Some(wins)) = (winner, wins) {
            report.events.push(GameEvent::ScoreUpdate {
                player_id: id,
                score: wins as i32,
            });
            if wins >= threshold {
                self.match_winner = Some(id);
                self.state = GameState::GameEnd;
                report.events.push(GameEvent::MatchComplete { winner: id });
                tracing::debug!(winner = id, wins, "Match complete");
                return;
            }
        }
        self.state = GameState::RoundEnd;
        tracing::debug!(round = self.round_number, winner = ?winner, "Round complete");
    }
}

fn spawn_players(config: &DetonatorConfig, arena: &Arena) -> Vec<Player> {
    let tuning = PlayerTuning::from_config(config);
    arena
        .spawn_points()
        .into_iter()
        .take(config.player_count)
        .enumerate()
        .map(|(slot, spawn)| Player::new(slot as PlayerId, spawn, tuning))
        .collect()
}

impl Default for Game {
    fn default() -> Self {
        Self::with_config(DetonatorConfig::default())
    }
}

impl ArenaGame for Game {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Detonator".to_string(),
            description: "Drop bombs, blast blocks, be the last one standing.".to_string(),
            min_players: MIN_PLAYERS as u8,
            max_players: MAX_PLAYERS as u8,
        }
    }

    fn update(&mut self, dt: f32) -> Vec<GameEvent> {
        Game::update(self, dt).events
    }

    arena_game_snapshot!(snapshot_type: GameSnapshot);

    fn apply_input(&mut self, player_id: PlayerId, input: &[u8]) {
        match rmp_serde::from_slice::<ArenaInput>(input) {
            Err(e) => {
                tracing::debug!(player_id, error = %e, "Dropped malformed arena input");
            },
            Ok(ai) => {
                self.move_player(player_id, ai.direction);
                if ai.bomb {
                    self.place_bomb(player_id);
                }
            },
        }
    }

    fn pause(&mut self) {
        Game::pause(self);
    }

    fn resume(&mut self) {
        Game::resume(self);
    }

    fn is_round_complete(&self) -> bool {
        matches!(self.state, GameState::RoundEnd | GameState::GameEnd)
    }

    fn round_results(&self) -> Vec<PlayerScore> {
        self.players
            .iter()
            .map(|p| PlayerScore {
                player_id: p.id,
                score: p.stats.wins as i32,
            })
            .collect()
    }
}
