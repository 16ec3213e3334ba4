//! Blood stains on room floors, also reused when actors bleed during play.

use crate::rng::GameRng;
use crate::state::Map;
use crate::tiles::TileKind;
use crate::types::Pos;

use super::room::Room;

/// One room in this many gets a stain.
const STAIN_CHANCE: u32 = 7;
/// Misses allowed before a splatter gives up; hits do not count.
const MAX_SPLATTER_MISSES: usize = 100;

/// Cells that can still take blood: plain floor only.
fn can_stain(map: &Map, pos: Pos) -> bool {
    map.tile_at(pos) == TileKind::Floor
}

/// Paints up to `amount` cells, `origin` first when it is still clean, the
/// rest among its neighbours. Returns how many cells were painted.
pub fn bleed(map: &mut Map, origin: Pos, amount: usize, rng: &mut GameRng) -> usize {
    if amount == 0 {
        return 0;
    }
    if can_stain(map, origin) {
        map.set_tile(origin, TileKind::BloodyFloor);
        return 1 + splatter(map, origin, amount - 1, rng);
    }
    splatter(map, origin, amount, rng)
}

fn splatter(map: &mut Map, origin: Pos, amount: usize, rng: &mut GameRng) -> usize {
    let mut placed = 0;
    let mut misses = 0;
    while placed < amount && misses < MAX_SPLATTER_MISSES {
        let target = origin.offset(rng.unit_offset(), rng.unit_offset());
        if can_stain(map, target) {
            map.set_tile(target, TileKind::BloodyFloor);
            placed += 1;
        } else {
            misses += 1;
        }
    }
    placed
}

/// Occasionally drops a stain of 2 to 4 extra cells somewhere inside `room`.
pub fn scatter_blood_stain(map: &mut Map, room: &Room, rng: &mut GameRng) -> bool {
    if !rng.one_in(STAIN_CHANCE) {
        return false;
    }
    let origin = Pos {
        y: rng.range_inclusive(room.y1 + 1, room.y2 - 1),
        x: rng.range_inclusive(room.x1 + 1, room.x2 - 1),
    };
    map.set_tile(origin, TileKind::BloodyFloor);
    let amount = rng.range_usize(2, 4);
    splatter(map, origin, amount, rng);
    true
}
