//! Field-of-view and line-of-sight calculations for map visibility.
//! This module exists to keep rendering-relevant sight rules deterministic and isolated.
//! It does not own hostile alerting or movement planning.

use super::*;
use crate::state::Map;

fn transform_octant(orig: Pos, x: i32, y: i32, oct: u8) -> Pos {
    match oct {
        0 => Pos { y: orig.y - y, x: orig.x + x },
        1 => Pos { y: orig.y - x, x: orig.x + y },
        2 => Pos { y: orig.y - x, x: orig.x - y },
        3 => Pos { y: orig.y - y, x: orig.x - x },
        4 => Pos { y: orig.y + y, x: orig.x - x },
        5 => Pos { y: orig.y + x, x: orig.x - y },
        6 => Pos { y: orig.y + x, x: orig.x + y },
        7 => Pos { y: orig.y + y, x: orig.x + x },
        _ => orig,
    }
}

fn within_radius(orig: Pos, p: Pos, radius: i32) -> bool {
    let dx = p.x - orig.x;
    let dy = p.y - orig.y;
    dx * dx + dy * dy <= radius * radius
}

/// Recomputes `visible` from `origin` and folds it into `explored`.
pub(super) fn compute_fov(map: &mut Map, origin: Pos, radius: i32) {
    map.clear_visible();
    if radius < 0 || !map.in_bounds(origin) {
        return;
    }
    map.set_visible(origin, true);
    for octant in 0..8 {
        scan_octant(map, origin, radius, 1, Slope::new(1, 1), Slope::new(0, 1), octant);
    }

    let min_y = (origin.y - radius).max(0);
    let max_y = (origin.y + radius + 1).min(map.height as i32);
    let min_x = (origin.x - radius).max(0);
    let max_x = (origin.x + radius + 1).min(map.width as i32);

    for y in min_y..max_y {
        for x in min_x..max_x {
            let p = Pos { y, x };
            if p == origin || !map.is_visible(p) {
                continue;
            }
            if !has_direct_line_of_sight(map, origin, p) {
                map.set_visible(p, false);
            }
        }
    }

    for y in min_y..max_y {
        for x in min_x..max_x {
            let p = Pos { y, x };
            if map.is_visible(p) {
                map.mark_explored(p);
            }
        }
    }
}

#[derive(Clone, Copy)]
struct Slope {
    y: i32,
    x: i32,
}

impl Slope {
    fn new(y: i32, x: i32) -> Self {
        Self { y, x }
    }

    fn greater_or_equal(&self, other: &Slope) -> bool {
        self.y * other.x >= other.y * self.x
    }

    fn greater_than(&self, other: &Slope) -> bool {
        self.y * other.x > other.y * self.x
    }
}

fn scan_octant(map: &mut Map, orig: Pos, radius: i32, dist: i32, start: Slope, end: Slope, oct: u8) {
    if dist > radius {
        return;
    }
    let mut blocked = false;
    let mut cur_start = start;
    for y in (0..=dist).rev() {
        let top = Slope::new(2 * y + 1, 2 * dist - 1);
        let bot = Slope::new(2 * y - 1, 2 * dist + 1);
        if cur_start.greater_or_equal(&bot) && top.greater_than(&end) {
            let p = transform_octant(orig, dist, y, oct);
            if within_radius(orig, p, radius) {
                map.set_visible(p, true);
            }
            if !map.is_transparent(p) {
                if !blocked {
                    scan_octant(map, orig, radius, dist + 1, cur_start, top, oct);
                    blocked = true;
                }
                cur_start = bot;
            } else if blocked {
                blocked = false;
            }
        }
    }
    if !blocked {
        scan_octant(map, orig, radius, dist + 1, cur_start, end, oct);
    }
}

fn has_direct_line_of_sight(map: &Map, origin: Pos, target: Pos) -> bool {
    let dx = target.x - origin.x;
    let dy = target.y - origin.y;
    let sx = dx.signum();
    let sy = dy.signum();
    let total_dist_x = dx.abs();
    let total_dist_y = dy.abs();

    let mut x = origin.x;
    let mut y = origin.y;
    let mut current_step_x = 0;
    let mut current_step_y = 0;

    while current_step_x < total_dist_x || current_step_y < total_dist_y {
        let lhs = (1 + 2 * current_step_x) * total_dist_y;
        let rhs = (1 + 2 * current_step_y) * total_dist_x;

        if lhs == rhs {
            x += sx;
            y += sy;
            current_step_x += 1;
            current_step_y += 1;
        } else if lhs < rhs {
            x += sx;
            current_step_x += 1;
        } else {
            y += sy;
            current_step_y += 1;
        }

        if x == target.x && y == target.y {
            break;
        }
        if !map.is_transparent(Pos { y, x }) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_FOV_RADIUS;
    use crate::game::test_support::*;

    fn walled_room(size: i32) -> Map {
        open_floor_state(size as usize, size as usize, Pos::new(1, 1)).map
    }

    #[test]
    fn open_room_is_visible_within_radius_only() {
        let mut map = walled_room(30);
        let origin = Pos::new(15, 15);
        compute_fov(&mut map, origin, 5);

        assert!(map.is_visible(origin));
        assert!(map.is_visible(Pos::new(18, 15)));
        assert!(map.is_visible(Pos::new(18, 18)));
        assert!(!map.is_visible(Pos::new(21, 15)));
        assert!(!map.is_visible(Pos::new(19, 19)));
    }

    #[test]
    fn repeat_is_deterministic_for_same_state() {
        let mut map = walled_room(12);
        map.set_tile(Pos::new(7, 5), TileKind::Wall);
        map.set_tile(Pos::new(7, 6), TileKind::Wall);
        let origin = Pos::new(5, 5);

        compute_fov(&mut map, origin, DEFAULT_FOV_RADIUS);
        let first = map.visible.clone();
        compute_fov(&mut map, origin, DEFAULT_FOV_RADIUS);

        assert_eq!(first, map.visible);
    }

    #[test]
    fn wall_occludes_corridor_behind_it() {
        let mut state = corridor_state(11, 5, Pos::new(3, 5));
        state.map.set_tile(Pos::new(6, 5), TileKind::Wall);
        compute_fov(&mut state.map, Pos::new(3, 5), 10);

        assert!(state.map.is_visible(Pos::new(5, 5)));
        assert!(state.map.is_visible(Pos::new(6, 5)));
        assert!(!state.map.is_visible(Pos::new(7, 5)));
    }

    #[test]
    fn explored_accumulates_while_visible_resets() {
        let mut state = corridor_state(20, 1, Pos::new(1, 1));
        compute_fov(&mut state.map, Pos::new(2, 1), 3);
        assert!(state.map.is_explored(Pos::new(4, 1)));

        compute_fov(&mut state.map, Pos::new(14, 1), 3);
        assert!(!state.map.is_visible(Pos::new(4, 1)));
        assert!(state.map.is_explored(Pos::new(4, 1)));
        assert!(state.map.is_explored(Pos::new(16, 1)));
    }

    #[test]
    fn light_does_not_leak_out_of_closed_room() {
        let mut map = Map::new(20, 20);
        let (r_start, r_end) = (4, 10);
        for y in (r_start + 1)..r_end {
            for x in (r_start + 1)..r_end {
                map.set_tile(Pos { y, x }, TileKind::Floor);
            }
        }

        for py in (r_start + 1)..r_end {
            for px in (r_start + 1)..r_end {
                let origin = Pos { y: py, x: px };
                compute_fov(&mut map, origin, 15);
                for p in map.positions() {
                    let outside = p.y < r_start || p.y > r_end || p.x < r_start || p.x > r_end;
                    assert!(!(outside && map.is_visible(p)), "light leaked to {p:?} from {origin:?}");
                }
            }
        }
    }
}
