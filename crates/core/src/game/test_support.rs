//! Shared test fixtures for the `game` submodule test suites.
//! This module exists to avoid repeating map and actor setup across many tests.
//! It does not own production gameplay logic.

use super::*;
use crate::content;
use crate::mapgen::Room;
use crate::state::{GameState, Map};

/// Floor everywhere inside a one-cell wall border, player at `player_pos`.
pub(crate) fn open_floor_state(width: usize, height: usize, player_pos: Pos) -> GameState {
    let mut map = Map::new(width, height);
    for y in 1..(height as i32 - 1) {
        for x in 1..(width as i32 - 1) {
            map.set_tile(Pos::new(x, y), TileKind::Floor);
        }
    }
    let player = content::actor_template(ActorKind::Player).build(player_pos);
    GameState::new(map, player)
}

/// A one-cell-tall corridor along row `y`, walls everywhere else.
pub(crate) fn corridor_state(width: usize, y: i32, player_pos: Pos) -> GameState {
    let mut map = Map::new(width, (y + 2) as usize);
    for x in 1..(width as i32 - 1) {
        map.set_tile(Pos::new(x, y), TileKind::Floor);
    }
    let player = content::actor_template(ActorKind::Player).build(player_pos);
    GameState::new(map, player)
}

pub(crate) fn add_hostile(state: &mut GameState, kind: ActorKind, pos: Pos) -> EntityId {
    state.spawn_actor(&content::actor_template(kind), pos)
}

/// Two rooms side by side joined by a short tunnel, rooms attached to the map.
pub(crate) fn two_room_state(player_pos: Pos) -> GameState {
    let mut state = open_floor_state(30, 12, player_pos);
    state.map.tiles.fill(TileKind::Wall);
    let rooms = vec![Room::new(1, 1, 8, 8), Room::new(12, 1, 8, 8)];
    for room in &rooms {
        for pos in room.interior() {
            state.map.set_tile(pos, TileKind::Floor);
        }
    }
    for x in 5..=16 {
        state.map.set_tile(Pos::new(x, 5), TileKind::Floor);
    }
    state.map.attach_rooms(rooms);
    state
}

pub(crate) fn reveal_all(state: &mut GameState) {
    state.map.visible.fill(true);
    state.map.explored.fill(true);
}
