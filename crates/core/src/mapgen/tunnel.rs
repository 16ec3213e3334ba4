//! L-shaped corridors between room centers, in four widths.

use crate::rng::GameRng;
use crate::types::Pos;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TunnelWidth {
    Single,
    /// Doubled toward +x/+y.
    DoubleUpper,
    /// Doubled toward -x/-y.
    DoubleLower,
    Triple,
}

impl TunnelWidth {
    const ALL: [TunnelWidth; 4] =
        [Self::Single, Self::DoubleUpper, Self::DoubleLower, Self::Triple];

    pub fn random(rng: &mut GameRng) -> Self {
        *rng.pick(&Self::ALL).unwrap_or(&Self::Single)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TunnelOrder {
    HorizontalFirst,
    VerticalFirst,
}

impl TunnelOrder {
    pub fn random(rng: &mut GameRng) -> Self {
        if rng.one_in(2) { Self::HorizontalFirst } else { Self::VerticalFirst }
    }

    fn corner(self, start: Pos, end: Pos) -> Pos {
        match self {
            Self::HorizontalFirst => Pos { y: start.y, x: end.x },
            Self::VerticalFirst => Pos { y: end.y, x: start.x },
        }
    }
}

/// Cells on the line from `from` to `to`, both endpoints included.
pub fn bresenham(from: Pos, to: Pos) -> Vec<Pos> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let step_x = (to.x - from.x).signum();
    let step_y = (to.y - from.y).signum();
    let mut err = dx + dy;
    let mut current = from;
    let mut cells = Vec::with_capacity((dx - dy + 1) as usize);

    loop {
        cells.push(current);
        if current == to {
            break;
        }
        let doubled = 2 * err;
        if doubled >= dy {
            err += dy;
            current.x += step_x;
        }
        if doubled <= dx {
            err += dx;
            current.y += step_y;
        }
    }
    cells
}

/// Cells to carve for a corridor from `start` to `end`. May contain duplicates
/// and cells outside the map; carving clips them.
pub fn tunnel_between(start: Pos, end: Pos, width: TunnelWidth, order: TunnelOrder) -> Vec<Pos> {
    let corner = order.corner(start, end);
    let mut spine = bresenham(start, corner);
    spine.extend(bresenham(corner, end));

    let (offsets, corner_block): (&[i32], &[(i32, i32)]) = match width {
        TunnelWidth::Single => (&[0], &[]),
        TunnelWidth::DoubleUpper => (&[0, 1], &[(1, 0), (0, 1), (1, 1)]),
        TunnelWidth::DoubleLower => (&[0, -1], &[(-1, 0), (0, -1), (-1, -1)]),
        TunnelWidth::Triple => (&[0, 1, -1], &BLOCK_3X3),
    };

    let mut cells: Vec<Pos> = spine
        .iter()
        .flat_map(|&pos| offsets.iter().map(move |&delta| pos.offset(delta, delta)))
        .collect();
    cells.extend(corner_block.iter().map(|&(dx, dy)| corner.offset(dx, dy)));
    cells
}

/// Picks width and order at random.
pub fn random_tunnel(start: Pos, end: Pos, rng: &mut GameRng) -> Vec<Pos> {
    let width = TunnelWidth::random(rng);
    let order = TunnelOrder::random(rng);
    tunnel_between(start, end, width, order)
}

const BLOCK_3X3: [(i32, i32); 9] =
    [(-1, -1), (0, -1), (1, -1), (-1, 0), (0, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];
