use serde::{Deserialize, Serialize};

/// Unique identifier for a competing player slot.
pub type PlayerId = u64;

/// Core trait a tick-driven arena game exposes to its host loop.
///
/// The host owns input capture, rendering, audio and persistence; the game
/// only advances its simulation and reports what happened.
pub trait ArenaGame {
    /// Game metadata for the menu screen.
    fn metadata(&self) -> GameMetadata;

    /// Advance the simulation by one step. Returns match-level events.
    fn update(&mut self, dt: f32) -> Vec<GameEvent>;

    /// Serialize a snapshot of the current state for a render collaborator.
    fn serialize_state(&self) -> Vec<u8>;

    /// Apply one encoded input command for a player.
    fn apply_input(&mut self, player_id: PlayerId, input: &[u8]);

    /// Simulation tick rate in Hz the host should drive `update` at.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Freeze the simulation.
    fn pause(&mut self);

    /// Unfreeze the simulation.
    fn resume(&mut self);

    /// Whether the current round is over (or the match has been decided).
    fn is_round_complete(&self) -> bool;

    /// Per-player standings for the current match.
    fn round_results(&self) -> Vec<PlayerScore>;
}

/// Game metadata for the menu screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub min_players: u8,
    pub max_players: u8,
}

/// Match-level events emitted by a game during update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerEliminated { player_id: PlayerId },
    ScoreUpdate { player_id: PlayerId, score: i32 },
    /// `winner` is `None` for a draw.
    RoundComplete { winner: Option<PlayerId> },
    MatchComplete { winner: PlayerId },
}

/// Score entry for a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub player_id: PlayerId,
    pub score: i32,
}

/// Generates `serialize_state` for a game exposing `fn snapshot(&self) -> $Snapshot`.
#[macro_export]
macro_rules! arena_game_snapshot {
    (snapshot_type: $Snapshot:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            let snapshot: $Snapshot = self.snapshot();
            rmp_serde::to_vec(&snapshot).expect("game snapshot serialization must succeed")
        }
    };
}
