use tracing_subscriber::EnvFilter;

use detonator_arena::config::DetonatorConfig;

/// Round cap for a scripted match where nobody reaches the win threshold.
const DEFAULT_MAX_ROUNDS: u32 = 25;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut config = DetonatorConfig::load();
    if let Some(seed) = std::env::args().nth(1) {
        match seed.parse() {
            Ok(seed) => config.seed = seed,
            Err(e) => tracing::warn!("Ignoring seed argument {seed:?}: {e}"),
        }
    }
    tracing::info!(seed = config.seed, players = config.player_count, "Detonator headless match starting");

    let summary = detonator_headless::run_match(config, DEFAULT_MAX_ROUNDS);
    tracing::info!(
        rounds = summary.rounds_played,
        ticks = summary.ticks,
        winner = ?summary.match_winner,
        "Match finished"
    );

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("Failed to encode match summary: {e}"),
    }
}
