use detonator_core::game_trait::PlayerScore;

use crate::player::Player;

/// Match standings for the leaderboard: most wins first, ties broken by
/// lower player id.
pub fn match_standings(players: &[Player]) -> Vec<PlayerScore> {
    let mut standings: Vec<PlayerScore> = players
        .iter()
        .map(|p| PlayerScore {
            player_id: p.id,
            score: p.stats.wins as i32,
        })
        .collect();
    standings.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
    standings
}
