//! Room placement loop that composes carving, tunnels, decoration and spawns.

use tracing::{info, warn};

use crate::config::GenerationParams;
use crate::content::{self, STARTER_GEAR};
use crate::error::GenerationError;
use crate::rng::GameRng;
use crate::state::{Actor, GameState, Map};
use crate::tiles::TileKind;
use crate::types::ItemKind;

use super::decor::scatter_blood_stain;
use super::room::Room;
use super::spawns::{PlacementContext, PlacementRequest, place_entities};
use super::tunnel::random_tunnel;

const SPAWN_ROOM_REQUEST: PlacementRequest<'static> = PlacementRequest {
    min_monsters: 0,
    max_monsters: 0,
    min_items: 0,
    max_items: 1,
    forced: &STARTER_GEAR,
};

pub struct DungeonGenerator<'a> {
    params: &'a GenerationParams,
    loot_table: Vec<ItemKind>,
}

impl<'a> DungeonGenerator<'a> {
    pub fn new(params: &'a GenerationParams) -> Self {
        Self { params, loot_table: content::expanded_loot_table() }
    }

    fn room_request(&self) -> PlacementRequest<'static> {
        PlacementRequest {
            min_monsters: self.params.min_monsters_per_room,
            max_monsters: self.params.max_monsters_per_room,
            min_items: self.params.min_items_per_room,
            max_items: self.params.max_items_per_room,
            forced: &[],
        }
    }

    fn sample_room(&self, rng: &mut GameRng) -> Room {
        let params = self.params;
        let width = rng.range_inclusive(params.room_min_size, params.room_max_size);
        let height = rng.range_inclusive(params.room_min_size, params.room_max_size);
        let x = rng.range_inclusive(0, params.map_width - width - 1);
        let y = rng.range_inclusive(0, params.map_height - height - 1);
        Room::new(x, y, width, height)
    }

    /// Builds the level around `player`, who ends up at the spawn room's center.
    /// Visibility is left untouched for the caller to compute.
    pub fn generate(&self, player: Actor, rng: &mut GameRng) -> Result<GameState, GenerationError> {
        let params = self.params;
        params.validate()?;

        let map = Map::new(params.map_width as usize, params.map_height as usize);
        let mut state = GameState::new(map, player);
        let mut rooms: Vec<Room> = Vec::new();
        let target_rooms = params.max_rooms.max(params.min_rooms);
        let mut attempts = 0;

        while rooms.len() < target_rooms && attempts < params.room_attempt_limit {
            attempts += 1;
            let candidate = self.sample_room(rng);
            if rooms.iter().any(|room| candidate.intersects(room)) {
                continue;
            }
            candidate.carve(&mut state.map);

            let context = PlacementContext {
                room: &candidate,
                room_index: rooms.len(),
                attempt_limit: params.placement_attempt_limit,
                loot_table: &self.loot_table,
            };
            match rooms.last() {
                None => {
                    state.player_mut().pos = candidate.center();
                    place_entities(&mut state, &context, &SPAWN_ROOM_REQUEST, rng)?;
                }
                Some(previous) => {
                    for pos in random_tunnel(previous.center(), candidate.center(), rng) {
                        state.map.set_tile(pos, TileKind::Floor);
                    }
                    scatter_blood_stain(&mut state.map, &candidate, rng);
                    place_entities(&mut state, &context, &self.room_request(), rng)?;
                }
            }
            rooms.push(candidate);
        }

        if rooms.len() < params.min_rooms {
            warn!(
                rooms = rooms.len(),
                min_rooms = params.min_rooms,
                attempts,
                "room_minimum_not_reached"
            );
        }

        info!(
            rooms = rooms.len(),
            attempts,
            hostiles = state.hostile_ids().len(),
            items = state.items.len(),
            "dungeon_generated"
        );
        state.map.attach_rooms(rooms);
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, VecDeque};

    use proptest::prelude::*;

    use super::*;
    use crate::state::Entity;
    use crate::types::{ActorKind, Pos};

    fn generate(seed: u64, params: &GenerationParams) -> GameState {
        let player = content::actor_template(ActorKind::Player).build(Pos::new(0, 0));
        let mut rng = GameRng::seed_from_u64(seed);
        DungeonGenerator::new(params).generate(player, &mut rng).expect("dungeon")
    }

    fn reachable_from(map: &Map, start: Pos) -> BTreeSet<Pos> {
        let mut seen = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(pos) = queue.pop_front() {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let next = pos.offset(dx, dy);
                    if map.is_walkable(next) && seen.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }
        seen
    }

    #[test]
    fn player_starts_at_spawn_room_center_with_starter_gear() {
        let state = generate(77, &GenerationParams::default());
        let spawn = *state.map.spawn_room().expect("spawn room");
        assert_eq!(state.player().pos, spawn.center());

        let hostiles_in_spawn = state
            .hostile_ids()
            .into_iter()
            .filter(|&id| spawn.interior_contains(state.actors[id].pos))
            .count();
        assert_eq!(hostiles_in_spawn, 0);

        let spawn_items: Vec<ItemKind> = state
            .items
            .values()
            .filter(|item| spawn.interior_contains(item.pos))
            .map(|item| item.kind)
            .collect();
        assert!(spawn_items.len() >= STARTER_GEAR.len());
        assert!(spawn_items.len() <= STARTER_GEAR.len() + 1);
        for kind in STARTER_GEAR {
            assert!(spawn_items.contains(&kind), "missing {kind:?}");
        }
    }

    #[test]
    fn default_parameters_reach_room_target() {
        let state = generate(3, &GenerationParams::default());
        assert!(state.map.rooms().len() >= 12);
        assert!(state.map.rooms().len() <= 15);
    }

    #[test]
    fn cramped_map_stops_at_attempt_limit() {
        let params = GenerationParams {
            map_width: 14,
            map_height: 14,
            room_min_size: 6,
            room_max_size: 8,
            min_rooms: 10,
            max_rooms: 10,
            room_attempt_limit: 50,
            ..GenerationParams::default()
        };
        let state = generate(9, &params);
        assert!(!state.map.rooms().is_empty());
        assert!(state.map.rooms().len() < 10);
    }

    #[test]
    fn smallest_valid_rooms_still_seat_the_starter_gear() {
        let params = GenerationParams { room_min_size: 4, room_max_size: 4, ..Default::default() };
        assert!(params.validate().is_ok());
        for seed in 0..16 {
            let state = generate(seed, &params);
            let spawn = *state.map.spawn_room().expect("spawn room");
            let starter_items =
                state.items.values().filter(|item| spawn.interior_contains(item.pos)).count();
            assert!(starter_items >= STARTER_GEAR.len());
        }
    }

    #[test]
    fn invalid_parameters_are_rejected_before_generation() {
        let params = GenerationParams { min_rooms: 0, max_rooms: 0, room_min_size: 1, ..Default::default() };
        let player = content::actor_template(ActorKind::Player).build(Pos::new(0, 0));
        let mut rng = GameRng::seed_from_u64(1);
        let result = DungeonGenerator::new(&params).generate(player, &mut rng);
        assert!(matches!(result, Err(GenerationError::InvalidParams(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn accepted_rooms_never_intersect(seed in any::<u64>()) {
            let state = generate(seed, &GenerationParams::default());
            let rooms = state.map.rooms();
            for (index, room) in rooms.iter().enumerate() {
                for other in &rooms[index + 1..] {
                    prop_assert!(!room.intersects(other));
                }
            }
        }

        #[test]
        fn every_room_interior_is_walkable(seed in any::<u64>()) {
            let state = generate(seed, &GenerationParams::default());
            for room in state.map.rooms() {
                for pos in room.interior() {
                    prop_assert!(state.map.is_walkable(pos));
                }
            }
        }

        #[test]
        fn every_room_is_reachable_from_spawn(seed in any::<u64>()) {
            let state = generate(seed, &GenerationParams::default());
            let reachable = reachable_from(&state.map, state.player().pos);
            for room in state.map.rooms() {
                prop_assert!(reachable.contains(&room.center()));
            }
        }

        #[test]
        fn spawned_entities_stand_on_walkable_distinct_cells(seed in any::<u64>()) {
            let state = generate(seed, &GenerationParams::default());
            let mut cells = BTreeSet::new();
            for entity in state.entities() {
                prop_assert!(state.map.is_walkable(entity.pos()));
                prop_assert!(cells.insert(entity.pos()));
            }
        }
    }
}
