pub mod game_trait;
pub mod player;
pub mod powerup;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::game_trait::{ArenaGame, PlayerId, PlayerScore};

    /// Assert that the game's serialized state differs from `before`.
    pub fn assert_game_state_changed(game: &dyn ArenaGame, before: &[u8]) {
        let after = game.serialize_state();
        assert_ne!(
            before,
            &after[..],
            "Game state should have changed after operation"
        );
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Every ArenaGame implementation must pass these. Game crates call
    // them from their own #[cfg(test)] modules with a started game.

    /// A started game must serialize to non-empty bytes.
    pub fn contract_snapshot_not_empty(game: &dyn ArenaGame) {
        assert!(
            !game.serialize_state().is_empty(),
            "serialize_state() must return non-empty bytes"
        );
    }

    /// apply_input() with valid data must change state.
    pub fn contract_apply_input_changes_state(
        game: &mut dyn ArenaGame,
        valid_input: &[u8],
        player_id: PlayerId,
    ) {
        let before = game.serialize_state();
        game.apply_input(player_id, valid_input);
        game.update(0.01);
        assert_game_state_changed(game, &before);
    }

    /// Garbage input must be dropped without touching state.
    pub fn contract_malformed_input_ignored(game: &mut dyn ArenaGame, player_id: PlayerId) {
        let before = game.serialize_state();
        game.apply_input(player_id, &[0xFF, 0x00, 0x13, 0x37]);
        game.apply_input(player_id, &[]);
        let after = game.serialize_state();
        assert_eq!(before, after, "Malformed input must be a no-op");
    }

    /// update() with dt>0 must advance the round timer.
    pub fn contract_update_advances_time(game: &mut dyn ArenaGame) {
        let before = game.serialize_state();
        game.update(0.5);
        assert_game_state_changed(game, &before);
    }

    /// Running update() enough times must eventually reach is_round_complete().
    pub fn contract_round_eventually_completes(game: &mut dyn ArenaGame, max_ticks: usize) {
        for _ in 0..max_ticks {
            game.update(1.0);
            if game.is_round_complete() {
                return;
            }
        }
        assert!(
            game.is_round_complete(),
            "Game must complete after {max_ticks} ticks of 1s each"
        );
    }

    /// pause() must freeze the simulation, resume() must unfreeze it.
    pub fn contract_pause_stops_updates(game: &mut dyn ArenaGame) {
        game.pause();
        let before = game.serialize_state();
        game.update(1.0);
        let during_pause = game.serialize_state();
        assert_eq!(before, during_pause, "State must not change while paused");

        game.resume();
        game.update(1.0);
        let after_resume = game.serialize_state();
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }

    /// round_results() must return an entry for each player.
    pub fn contract_round_results_complete(
        game: &dyn ArenaGame,
        expected_players: usize,
    ) -> Vec<PlayerScore> {
        let results = game.round_results();
        assert_eq!(
            results.len(),
            expected_players,
            "round_results must have one entry per player"
        );
        results
    }
}
