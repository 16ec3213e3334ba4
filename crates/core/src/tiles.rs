//! Static per-kind tile attributes backing generation, pathing and sight.

use crate::types::{Glyph, Rgb};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TileKind {
    Wall,
    Floor,
    BloodyFloor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileDef {
    pub walkable: bool,
    pub transparent: bool,
    /// Shown for explored cells outside the field of view.
    pub dark: Glyph,
    /// Shown for cells inside the field of view.
    pub light: Glyph,
}

/// Drawn for cells that were never explored.
pub const SHROUD: Glyph = Glyph { ch: '?', fg: Rgb(24, 24, 24), bg: Rgb(0, 0, 0) };

const FLOOR: TileDef = TileDef {
    walkable: true,
    transparent: true,
    dark: Glyph { ch: '.', fg: Rgb(128, 128, 128), bg: Rgb(64, 64, 64) },
    light: Glyph { ch: '.', fg: Rgb(196, 196, 196), bg: Rgb(160, 172, 172) },
};

const BLOODY_FLOOR: TileDef = TileDef {
    walkable: true,
    transparent: true,
    dark: Glyph { ch: '~', fg: Rgb(64, 0, 0), bg: Rgb(32, 0, 0) },
    light: Glyph { ch: '~', fg: Rgb(255, 0, 0), bg: Rgb(128, 0, 0) },
};

const WALL: TileDef = TileDef {
    walkable: false,
    transparent: false,
    dark: Glyph { ch: '#', fg: Rgb(96, 96, 96), bg: Rgb(32, 32, 32) },
    light: Glyph { ch: '#', fg: Rgb(0, 255, 255), bg: Rgb(0, 196, 196) },
};

impl TileKind {
    pub const fn def(self) -> &'static TileDef {
        match self {
            TileKind::Wall => &WALL,
            TileKind::Floor => &FLOOR,
            TileKind::BloodyFloor => &BLOODY_FLOOR,
        }
    }

    pub const fn walkable(self) -> bool {
        self.def().walkable
    }

    pub const fn transparent(self) -> bool {
        self.def().transparent
    }

    pub(crate) const fn code(self) -> u8 {
        match self {
            TileKind::Wall => 0,
            TileKind::Floor => 1,
            TileKind::BloodyFloor => 2,
        }
    }
}
