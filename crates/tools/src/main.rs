use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crawl_core::{Entity, Game, GameConfig, GameState, Pos, TileKind};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for dungeon generation
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Optional TOML file overriding the default settings
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Print a JSON summary instead of the map
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct DungeonSummary {
    seed: u64,
    width: usize,
    height: usize,
    rooms: usize,
    hostiles: usize,
    items: usize,
    bloody_cells: usize,
    player: Pos,
    fingerprint: u64,
}

impl DungeonSummary {
    fn from_game(game: &Game) -> Self {
        let state = game.state();
        Self {
            seed: game.seed(),
            width: state.map.width,
            height: state.map.height,
            rooms: state.map.rooms().len(),
            hostiles: state.hostile_ids().len(),
            items: state.items.len(),
            bloody_cells: state
                .map
                .tiles
                .iter()
                .filter(|&&tile| tile == TileKind::BloodyFloor)
                .count(),
            player: game.player_pos(),
            fingerprint: state.fingerprint(),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).compact().init();
}

fn render(state: &GameState) -> String {
    let mut rows: Vec<Vec<char>> = (0..state.map.height)
        .map(|y| {
            (0..state.map.width)
                .map(|x| {
                    let pos = Pos::new(x as i32, y as i32);
                    state.map.tile_at(pos).def().light.ch
                })
                .collect()
        })
        .collect();

    let mut glyphs: Vec<(_, Pos, char)> = state
        .actors
        .values()
        .map(|actor| (actor.render_order(), actor.pos, actor.glyph.ch))
        .chain(state.items.values().map(|item| (item.render_order(), item.pos, item.glyph.ch)))
        .collect();
    glyphs.sort_by_key(|&(order, _, _)| order);
    for (_, pos, ch) in glyphs {
        if let Some(cell) =
            rows.get_mut(pos.y as usize).and_then(|row| row.get_mut(pos.x as usize))
        {
            *cell = ch;
        }
    }

    rows.into_iter().map(|row| row.into_iter().collect::<String>()).collect::<Vec<_>>().join("\n")
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => GameConfig::default(),
    };
    let game = Game::new(args.seed, &config)
        .with_context(|| format!("Failed to generate dungeon for seed {}", args.seed))?;

    let summary = DungeonSummary::from_game(&game);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", render(game.state()));
    println!();
    println!("Seed: {}", summary.seed);
    println!("Rooms: {}", summary.rooms);
    println!("Hostiles: {}", summary.hostiles);
    println!("Items: {}", summary.items);
    println!("Blood stains: {}", summary.bloody_cells);
    println!("Fingerprint: {:016x}", summary.fingerprint);

    Ok(())
}
