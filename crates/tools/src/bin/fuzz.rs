use std::collections::BTreeSet;

use anyhow::{Result, ensure};
use clap::Parser;
use crawl_core::{Game, GameConfig, PlayerAction, Pos, TileKind};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    turns: u32,
}

fn offset(rng: &mut ChaCha8Rng) -> i32 {
    (rng.next_u64() % 3) as i32 - 1
}

fn choose_action(rng: &mut ChaCha8Rng, game: &Game) -> PlayerAction {
    match rng.next_u64() % 13 {
        0 => PlayerAction::Wait,
        1 => PlayerAction::Pickup,
        2 => PlayerAction::Drop { index: (rng.next_u64() % 4) as usize },
        3 => {
            let rooms = game.state().map.rooms();
            if rooms.is_empty() {
                return PlayerAction::Wait;
            }
            let room = &rooms[rng.next_u64() as usize % rooms.len()];
            PlayerAction::TravelToward(room.center())
        }
        4 => PlayerAction::Use { index: (rng.next_u64() % 4) as usize },
        _ => PlayerAction::Move { dx: offset(rng), dy: offset(rng) },
    }
}

fn check_invariants(game: &Game, room_count: usize) -> Result<()> {
    let state = game.state();
    ensure!(state.map.rooms().len() == room_count, "Invariant failed: room list changed");

    let mut occupied: BTreeSet<Pos> = BTreeSet::new();
    for actor in state.actors.values() {
        ensure!(actor.fighter.hp <= actor.fighter.max_hp, "Invariant failed: HP > Max HP");
        ensure!(
            state.map.tile_at(actor.pos) != TileKind::Wall,
            "Invariant failed: {} inside wall at {:?}",
            actor.name,
            actor.pos
        );
        if actor.is_alive() {
            ensure!(occupied.insert(actor.pos), "Invariant failed: shared cell {:?}", actor.pos);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .compact()
        .init();
    let args = Args::parse();

    info!(seed = args.seed, turns = args.turns, "fuzz_started");
    let mut game = Game::new(args.seed, &GameConfig::default())?;
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let room_count = game.state().map.rooms().len();

    let mut refused = 0u32;
    for _ in 0..args.turns {
        if game.is_player_dead() {
            println!("Player died on turn {}", game.turn());
            break;
        }
        let action = choose_action(&mut rng, &game);
        if let Err(error) = game.handle_player_action(action) {
            debug!(?action, %error, "action_refused");
            refused += 1;
        }
        game.drain_events();
        check_invariants(&game, room_count)?;
    }

    println!(
        "Fuzzing completed: {} turns, {} refused actions, snapshot {:016x}",
        game.turn(),
        refused,
        game.snapshot_hash()
    );
    Ok(())
}
