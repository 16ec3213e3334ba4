use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A requested action cannot be performed right now. Always recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("That way is blocked.")]
    Blocked,
    #[error("Nothing to attack.")]
    NothingToAttack,
    #[error("There is nothing here to pick up.")]
    NothingToPickUp,
    #[error("Your inventory is full.")]
    InventoryFull,
    #[error("That item is not in your inventory.")]
    NotInInventory,
    #[error("You cannot use that item.")]
    NotUsable,
    #[error("Your health is already full.")]
    HealthFull,
    #[error("You cannot find a way to get there.")]
    NoRouteToDestination,
    #[error("The actor is no longer present.")]
    ActorMissing,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("invalid generation parameters: {0}")]
    InvalidParams(String),
    #[error("room {room} has no free interior cell for a forced spawn")]
    RoomSaturated { room: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(#[from] GenerationError),
}
