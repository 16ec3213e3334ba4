pub mod ailments;
pub mod config;
pub mod content;
pub mod error;
pub mod game;
pub mod mapgen;
pub mod rng;
pub mod state;
pub mod tiles;
pub mod types;

pub use config::{GameConfig, GenerationParams};
pub use error::{ActionError, ConfigError, GenerationError};
pub use game::{Game, PlayerAction};
pub use mapgen::{Room, generate_dungeon};
pub use rng::GameRng;
pub use state::{Actor, Entity, GameState, Item, Map};
pub use tiles::TileKind;
pub use types::*;
