//! Procedural dungeon generation split into coherent submodules.

mod decor;
mod generator;
mod room;
mod spawns;
mod tunnel;

pub use decor::{bleed, scatter_blood_stain};
pub use generator::DungeonGenerator;
pub use room::Room;
pub use spawns::{PlacementRequest, PlacementSummary};
pub use tunnel::{TunnelOrder, TunnelWidth, bresenham, random_tunnel, tunnel_between};

use crate::config::GenerationParams;
use crate::error::GenerationError;
use crate::rng::GameRng;
use crate::state::{Actor, GameState};

pub fn generate_dungeon(
    params: &GenerationParams,
    player: Actor,
    rng: &mut GameRng,
) -> Result<GameState, GenerationError> {
    DungeonGenerator::new(params).generate(player, rng)
}
