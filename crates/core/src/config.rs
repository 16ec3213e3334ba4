//! Session and dungeon-generation settings, loadable from TOML.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::content::STARTER_GEAR;
use crate::error::{ConfigError, GenerationError};

pub const DEFAULT_FOV_RADIUS: i32 = 17;

const SPAWN_ROOM_OCCUPANTS: i32 = STARTER_GEAR.len() as i32 + 2;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub max_rooms: usize,
    pub min_rooms: usize,
    pub room_min_size: i32,
    pub room_max_size: i32,
    pub map_width: i32,
    pub map_height: i32,
    pub min_monsters_per_room: usize,
    pub max_monsters_per_room: usize,
    pub min_items_per_room: usize,
    pub max_items_per_room: usize,
    /// Hard stop for room placement attempts, even while still under `min_rooms`.
    pub room_attempt_limit: usize,
    /// Cell samples per random monster or item before it is skipped.
    pub placement_attempt_limit: usize,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_rooms: 15,
            min_rooms: 12,
            room_min_size: 6,
            room_max_size: 10,
            map_width: 80,
            map_height: 45,
            min_monsters_per_room: 2,
            max_monsters_per_room: 4,
            min_items_per_room: 0,
            max_items_per_room: 3,
            room_attempt_limit: 1_000,
            placement_attempt_limit: 100,
        }
    }
}

impl GenerationParams {
    pub fn validate(&self) -> Result<(), GenerationError> {
        let invalid = |reason: String| Err(GenerationError::InvalidParams(reason));

        if self.map_width <= 0 || self.map_height <= 0 {
            return invalid(format!(
                "map must have positive dimensions, got {}x{}",
                self.map_width, self.map_height
            ));
        }
        // The spawn room must seat the player, the starter gear and one random item.
        let smallest_interior = (self.room_min_size - 1).max(0).pow(2);
        if smallest_interior < SPAWN_ROOM_OCCUPANTS {
            return invalid(format!(
                "room_min_size {} leaves no room for the starting gear",
                self.room_min_size
            ));
        }
        if self.room_min_size > self.room_max_size {
            return invalid(format!(
                "room_min_size {} exceeds room_max_size {}",
                self.room_min_size, self.room_max_size
            ));
        }
        if self.room_max_size >= self.map_width || self.room_max_size >= self.map_height {
            return invalid(format!(
                "room_max_size {} does not fit a {}x{} map",
                self.room_max_size, self.map_width, self.map_height
            ));
        }
        if self.min_monsters_per_room > self.max_monsters_per_room {
            return invalid("min_monsters_per_room exceeds max_monsters_per_room".to_string());
        }
        if self.min_items_per_room > self.max_items_per_room {
            return invalid("min_items_per_room exceeds max_items_per_room".to_string());
        }
        if self.room_attempt_limit == 0 {
            return invalid("room_attempt_limit must be positive".to_string());
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub fov_radius: i32,
    pub generation: GenerationParams,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self { fov_radius: DEFAULT_FOV_RADIUS, generation: GenerationParams::default() }
    }
}

impl GameConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.generation.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&source)
    }
}
