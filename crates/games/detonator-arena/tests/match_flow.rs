//! Full rounds driven through the public command surface only.

use detonator_arena::arena::{Arena, Tile};
use detonator_arena::bomb::BombManager;
use detonator_arena::config::DetonatorConfig;
use detonator_arena::{Direction, Game, GameState, GridPos};
use detonator_core::game_trait::{ArenaGame, GameEvent};

const DT: f32 = 1.0 / 60.0;

fn started(config: DetonatorConfig) -> Game {
    let mut game = Game::with_config(config);
    game.start();
    game
}

/// Tick until the game leaves `Playing`, collecting every event.
fn play_out(game: &mut Game, max_ticks: usize) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..max_ticks {
        events.extend(game.update(DT).events);
        if game.state() != GameState::Playing {
            break;
        }
    }
    events
}

fn walk(game: &mut Game, id: u64, direction: Direction, steps: usize) {
    for _ in 0..steps {
        game.move_player(id, direction);
    }
}

#[test]
fn bomb_on_cleared_cross_becomes_five_tile_explosion() {
    let config = DetonatorConfig::default();
    let mut arena = Arena::from_config(&config);
    for (x, y) in [(5, 5), (5, 4), (5, 6), (4, 5), (6, 5)] {
        arena.set_tile(x, y, Tile::Floor);
    }
    let mut bombs = BombManager::new(config.bomb_timer, config.explosion_duration);
    assert!(bombs.place_bomb(GridPos::new(5, 5), 0, 1));

    let mut elapsed = 0.0;
    while elapsed < config.bomb_timer + 0.05 {
        bombs.update(DT, &mut arena);
        elapsed += DT;
    }
    assert_eq!(bombs.bomb_count(), 0);
    assert_eq!(bombs.explosion_count(), 1);
    for (x, y) in [(5, 5), (5, 4), (5, 6), (4, 5), (6, 5)] {
        assert!(bombs.is_explosion(x, y));
    }
}

#[test]
fn second_bomb_follows_one_tick_after_first() {
    let config = DetonatorConfig::default();
    let mut arena = Arena::from_config(&config);
    for x in 3..=7 {
        arena.set_tile(x, 5, Tile::Floor);
    }
    let mut bombs = BombManager::new(config.bomb_timer, config.explosion_duration);
    bombs.place_bomb(GridPos::new(3, 5), 0, 2);
    for _ in 0..30 {
        bombs.update(DT, &mut arena);
    }
    bombs.place_bomb(GridPos::new(5, 5), 1, 2);

    let mut first_tick = None;
    for tick in 0..400 {
        let result = bombs.update(DT, &mut arena);
        if !result.exploded.is_empty() && first_tick.is_none() {
            first_tick = Some(tick);
            assert_eq!(bombs.bomb_count(), 1);
        }
        if let Some(first) = first_tick
            && tick == first + 1
        {
            assert_eq!(bombs.bomb_count(), 0);
            assert_eq!(bombs.explosion_count(), 2);
            return;
        }
    }
    panic!("First bomb never exploded");
}

#[test]
fn own_bomb_pins_its_owner_until_it_goes_off() {
    let mut game = started(DetonatorConfig {
        powerup_spawn_chance: 0.0,
        ..Default::default()
    });

    walk(&mut game, 0, Direction::Right, 12);
    assert_eq!(game.player(0).unwrap().grid_position(), GridPos::new(2, 1));
    let (x, y) = (game.player(0).unwrap().x, game.player(0).unwrap().y);
    assert!(game.place_bomb(0));
    assert_eq!(game.arena().get_tile(2, 1), Tile::Bomb);

    for direction in [Direction::Left, Direction::Right, Direction::Up, Direction::Down] {
        walk(&mut game, 0, direction, 5);
    }
    let pinned = game.player(0).unwrap();
    assert_eq!((pinned.x, pinned.y), (x, y), "Bomb cell is solid under its owner");

    let events = play_out(&mut game, 400);
    assert!(events.contains(&GameEvent::PlayerEliminated { player_id: 0 }));
    assert_eq!(game.round_winner(), Some(1));
    assert_eq!(game.arena().get_tile(2, 1), Tile::Floor);
    assert_eq!(game.arena().get_tile(3, 1), Tile::Floor, "Blast broke the soft block");
}

#[test]
fn timing_out_is_a_draw() {
    let mut game = started(DetonatorConfig {
        round_time: 5.0,
        ..Default::default()
    });

    walk(&mut game, 0, Direction::Right, 12);
    walk(&mut game, 1, Direction::Left, 12);
    let events = play_out(&mut game, 400);
    assert_eq!(game.state(), GameState::RoundEnd);
    assert_eq!(game.round_winner(), None);
    assert_eq!(game.alive_player_count(), 0);
    assert!(events.contains(&GameEvent::RoundComplete { winner: None }));

    game.next_round();
    assert_eq!(game.state(), GameState::Playing);
    assert_eq!(game.round_number(), 2);
    assert_eq!(game.player(0).unwrap().grid_position(), GridPos::new(1, 1));
    assert!(game.players().iter().all(|p| p.stats.wins == 0 && p.alive));
}

#[test]
fn opponent_blowing_itself_up_hands_over_the_match() {
    let mut game = started(DetonatorConfig {
        rounds_to_win: 2,
        ..Default::default()
    });

    for round in 1..=2 {
        assert!(game.place_bomb(1));
        let events = play_out(&mut game, 400);
        assert_eq!(game.round_winner(), Some(0));
        assert!(events.contains(&GameEvent::PlayerEliminated { player_id: 1 }));
        assert_eq!(game.player(0).unwrap().stats.wins, round);
        if round == 1 {
            assert_eq!(game.state(), GameState::RoundEnd);
            assert!(!events.iter().any(|e| matches!(e, GameEvent::MatchComplete { .. })));
            game.next_round();
        } else {
            assert!(events.contains(&GameEvent::MatchComplete { winner: 0 }));
        }
    }

    assert_eq!(game.state(), GameState::GameEnd);
    assert_eq!(game.match_winner(), Some(0));
    assert!(game.is_round_complete());

    game.update(DT);
    game.pause();
    game.next_round();
    assert_eq!(game.state(), GameState::GameEnd);

    game.reset();
    assert_eq!(game.state(), GameState::Menu);
    assert!(game.players().iter().all(|p| p.stats.wins == 0));
    game.start();
    assert_eq!(game.state(), GameState::Playing);
}

#[test]
fn four_players_fill_every_corner() {
    let game = Game::with_config(DetonatorConfig {
        player_count: 4,
        ..Default::default()
    });
    let cells: Vec<GridPos> = game.players().iter().map(|p| p.grid_position()).collect();
    assert_eq!(cells, game.spawn_points());
    assert_eq!(game.round_results().len(), 4);
}

#[test]
fn same_seed_reproduces_terrain_drops() {
    let config = DetonatorConfig {
        powerup_spawn_chance: 0.5,
        seed: 1234,
        ..Default::default()
    };
    let run = |config: DetonatorConfig| {
        let mut game = started(config);
        game.place_bomb(0);
        for _ in 0..200 {
            game.update(DT);
        }
        game.snapshot()
    };
    assert_eq!(run(config.clone()), run(config));
}
