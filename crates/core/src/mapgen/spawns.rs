//! Monster, loot and forced-item placement inside a single room.

use tracing::{debug, warn};

use crate::content::{self, COMMON_HOSTILE_PERCENT};
use crate::error::GenerationError;
use crate::rng::GameRng;
use crate::state::GameState;
use crate::types::{ActorKind, ItemKind, Pos};

use super::room::Room;

/// Counts are inclusive ranges; `forced` items always land in the room.
#[derive(Clone, Debug)]
pub struct PlacementRequest<'a> {
    pub min_monsters: usize,
    pub max_monsters: usize,
    pub min_items: usize,
    pub max_items: usize,
    pub forced: &'a [ItemKind],
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlacementSummary {
    pub monsters: usize,
    pub items: usize,
    pub forced: usize,
    pub skipped: usize,
}

pub(super) struct PlacementContext<'a> {
    pub(super) room: &'a Room,
    pub(super) room_index: usize,
    pub(super) attempt_limit: usize,
    pub(super) loot_table: &'a [ItemKind],
}

fn random_interior_cell(room: &Room, rng: &mut GameRng) -> Pos {
    Pos {
        y: rng.range_inclusive(room.y1 + 1, room.y2 - 1),
        x: rng.range_inclusive(room.x1 + 1, room.x2 - 1),
    }
}

fn sample_free_cell(
    state: &GameState,
    room: &Room,
    attempt_limit: usize,
    rng: &mut GameRng,
) -> Option<Pos> {
    (0..attempt_limit)
        .map(|_| random_interior_cell(room, rng))
        .find(|&pos| !state.is_occupied(pos))
}

fn roll_hostile_kind(rng: &mut GameRng) -> ActorKind {
    if rng.percent(COMMON_HOSTILE_PERCENT) { ActorKind::Infected } else { ActorKind::InfectedBrute }
}

pub(super) fn place_entities(
    state: &mut GameState,
    context: &PlacementContext<'_>,
    request: &PlacementRequest<'_>,
    rng: &mut GameRng,
) -> Result<PlacementSummary, GenerationError> {
    let room = context.room;
    let mut summary = PlacementSummary::default();

    let monster_count = rng.range_usize(request.min_monsters, request.max_monsters);
    let item_count = rng.range_usize(request.min_items, request.max_items);

    for _ in 0..monster_count {
        let Some(pos) = sample_free_cell(state, room, context.attempt_limit, rng) else {
            summary.skipped += 1;
            continue;
        };
        let kind = roll_hostile_kind(rng);
        state.spawn_actor(&content::actor_template(kind), pos);
        summary.monsters += 1;
    }

    for _ in 0..item_count {
        let Some(pos) = sample_free_cell(state, room, context.attempt_limit, rng) else {
            summary.skipped += 1;
            continue;
        };
        let Some(&kind) = rng.pick(context.loot_table) else {
            break;
        };
        state.spawn_item(&content::item_template(kind), pos);
        summary.items += 1;
    }

    for &kind in request.forced {
        if room.interior().all(|pos| state.is_occupied(pos)) {
            warn!(room = context.room_index, item = ?kind, "forced_spawn_room_saturated");
            return Err(GenerationError::RoomSaturated { room: context.room_index });
        }
        // At least one free cell exists, so this terminates.
        let pos = loop {
            let candidate = random_interior_cell(room, rng);
            if !state.is_occupied(candidate) {
                break candidate;
            }
        };
        state.spawn_item(&content::item_template(kind), pos);
        summary.forced += 1;
    }

    debug!(
        room = context.room_index,
        monsters = summary.monsters,
        items = summary.items,
        forced = summary.forced,
        skipped = summary.skipped,
        "room_populated"
    );
    Ok(summary)
}
