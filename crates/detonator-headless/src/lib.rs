use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use detonator_arena::config::DetonatorConfig;
use detonator_arena::scoring;
use detonator_arena::{ArenaInput, Direction, Game, GameSnapshot, GameState};
use detonator_core::game_trait::{ArenaGame, GameEvent, PlayerId, PlayerScore};

/// Ticks between scripted direction changes.
const REPLAN_TICKS: u64 = 12;
/// Per-tick chance a scripted player presses the bomb button.
const BOMB_CHANCE: f64 = 0.04;
const DIRECTIONS: [Direction; 5] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
    Direction::None,
];

/// Outcome of one headless match.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub rounds_played: u32,
    pub ticks: u64,
    pub match_winner: Option<PlayerId>,
    pub standings: Vec<PlayerScore>,
    pub final_state: GameSnapshot,
}

/// Seeded random input source standing in for a human player.
struct ScriptedPlayer {
    id: PlayerId,
    heading: Direction,
}

impl ScriptedPlayer {
    fn next_input(&mut self, tick: u64, rng: &mut StdRng) -> ArenaInput {
        if tick % REPLAN_TICKS == 0 {
            self.heading = DIRECTIONS[rng.random_range(0..DIRECTIONS.len())];
        }
        ArenaInput {
            direction: self.heading,
            bomb: rng.random_bool(BOMB_CHANCE),
        }
    }
}

/// Drive a full match at the game's tick rate until a player takes it or
/// `max_rounds` rounds have been played.
pub fn run_match(config: DetonatorConfig, max_rounds: u32) -> MatchSummary {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut game = Game::with_config(config);
    let dt = 1.0 / game.tick_rate();
    let mut script: Vec<ScriptedPlayer> = game
        .players()
        .iter()
        .map(|p| ScriptedPlayer {
            id: p.id,
            heading: Direction::None,
        })
        .collect();

    game.start();
    let mut ticks = 0u64;
    loop {
        for player in &mut script {
            let input = player.next_input(ticks, &mut rng);
            match rmp_serde::to_vec(&input) {
                Ok(bytes) => game.apply_input(player.id, &bytes),
                Err(e) => tracing::warn!(player_id = player.id, error = %e, "Failed to encode input"),
            }
        }

        for event in ArenaGame::update(&mut game, dt) {
            log_event(&event);
        }
        ticks += 1;

        match game.state() {
            GameState::GameEnd => break,
            GameState::RoundEnd if game.round_number() >= max_rounds => break,
            GameState::RoundEnd => game.next_round(),
            _ => {},
        }
    }

    MatchSummary {
        rounds_played: game.round_number(),
        ticks,
        match_winner: game.match_winner(),
        standings: scoring::match_standings(game.players()),
        final_state: game.snapshot(),
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::PlayerEliminated { player_id } => {
            tracing::info!(player_id, "Player eliminated");
        },
        GameEvent::ScoreUpdate { player_id, score } => {
            tracing::info!(player_id, wins = score, "Round won");
        },
        GameEvent::RoundComplete { winner } => {
            tracing::info!(winner = ?winner, "Round complete");
        },
        GameEvent::MatchComplete { winner } => {
            tracing::info!(winner, "Match complete");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config(seed: u64) -> DetonatorConfig {
        DetonatorConfig {
            round_time: 20.0,
            rounds_to_win: 2,
            seed,
            ..Default::default()
        }
    }

    #[test]
    fn match_terminates() {
        let summary = run_match(quick_config(7), 5);
        assert!(summary.rounds_played >= 1 && summary.rounds_played <= 5);
        assert_eq!(summary.standings.len(), 2);
        if let Some(winner) = summary.match_winner {
            assert_eq!(summary.standings[0].player_id, winner);
            assert_eq!(summary.standings[0].score, 2);
        }
    }

    #[test]
    fn same_seed_same_match() {
        let a = run_match(quick_config(42), 3);
        let b = run_match(quick_config(42), 3);
        assert_eq!(a.ticks, b.ticks);
        assert_eq!(a.match_winner, b.match_winner);
        assert_eq!(a.final_state, b.final_state);
    }

    #[test]
    fn summary_serializes_to_json() {
        let summary = run_match(quick_config(1), 1);
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["final_state"]["grid"].is_array());
        assert_eq!(json["rounds_played"], 1);
    }
}
