//! Rectangular rooms: bounds, centers, interiors and overlap tests.

use crate::state::Map;
use crate::tiles::TileKind;
use crate::types::Pos;

/// Bounds include the wall border; the interior is everything strictly inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Room {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Room {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x1: x, y1: y, x2: x + width, y2: y + height }
    }

    pub fn center(&self) -> Pos {
        Pos { y: (self.y1 + self.y2) / 2, x: (self.x1 + self.x2) / 2 }
    }

    /// Inclusive-bounds test, so rooms that only share a wall still intersect.
    pub fn intersects(&self, other: &Room) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }

    pub fn interior_contains(&self, pos: Pos) -> bool {
        pos.x > self.x1 && pos.x < self.x2 && pos.y > self.y1 && pos.y < self.y2
    }

    pub fn interior(&self) -> impl Iterator<Item = Pos> + '_ {
        ((self.y1 + 1)..self.y2)
            .flat_map(move |y| ((self.x1 + 1)..self.x2).map(move |x| Pos { y, x }))
    }

    pub(super) fn carve(&self, map: &mut Map) {
        for pos in self.interior() {
            map.set_tile(pos, TileKind::Floor);
        }
    }
}
