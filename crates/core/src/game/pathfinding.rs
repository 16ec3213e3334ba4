//! Weighted cost maps and shortest-path queries over the dungeon grid.
//! This module exists so hostile pursuit and player travel share one routing rule.
//! It does not own AI state transitions or action execution.

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use super::*;
use crate::state::{AiTuning, Entity, GameState};

const CARDINAL_STEP: u32 = 2;
const DIAGONAL_STEP: u32 = 3;

const NEIGHBOR_STEPS: [(i32, i32, u32); 8] = [
    (0, -1, CARDINAL_STEP),
    (1, 0, CARDINAL_STEP),
    (0, 1, CARDINAL_STEP),
    (-1, 0, CARDINAL_STEP),
    (1, -1, DIAGONAL_STEP),
    (1, 1, DIAGONAL_STEP),
    (-1, 1, DIAGONAL_STEP),
    (-1, -1, DIAGONAL_STEP),
];

/// Which cells a path query may route through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Knowledge {
    /// Every walkable cell, explored or not. Hostiles route this way.
    Omniscient,
    /// Only cells the player has already explored.
    Explored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathRequest {
    pub from: Pos,
    pub to: Pos,
    pub block_cost: u32,
    pub corpse_cost: u32,
    pub knowledge: Knowledge,
}

impl PathRequest {
    pub fn new(from: Pos, to: Pos) -> Self {
        Self { from, to, block_cost: 0, corpse_cost: 0, knowledge: Knowledge::Omniscient }
    }

    pub fn with_tuning(mut self, tuning: AiTuning) -> Self {
        self.block_cost = tuning.block_cost;
        self.corpse_cost = tuning.corpse_cost;
        self
    }

    pub fn fog_limited(mut self) -> Self {
        self.knowledge = Knowledge::Explored;
        self
    }
}

/// Per-cell price of stepping into a cell; zero means impassable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostMap {
    width: usize,
    height: usize,
    costs: Vec<u32>,
}

impl CostMap {
    pub fn cost_at(&self, pos: Pos) -> u32 {
        if pos.x < 0 || pos.y < 0 || pos.x as usize >= self.width || pos.y as usize >= self.height
        {
            return 0;
        }
        self.costs[(pos.y as usize) * self.width + (pos.x as usize)]
    }

    fn add(&mut self, pos: Pos, extra: u32) {
        let current = self.cost_at(pos);
        if current == 0 {
            return;
        }
        let idx = (pos.y as usize) * self.width + (pos.x as usize);
        self.costs[idx] = current.saturating_add(extra);
    }

    /// Cells from `start` (excluded) to `goal` (included); empty when the goal
    /// is unreachable or equal to `start`.
    pub fn shortest_path(&self, start: Pos, goal: Pos) -> Vec<Pos> {
        if start == goal || self.cost_at(goal) == 0 {
            return Vec::new();
        }

        let mut open_set = BTreeSet::new();
        let mut g_score: BTreeMap<Pos, u32> = BTreeMap::new();
        let mut came_from = BTreeMap::new();
        let h = octile(start, goal);
        open_set.insert(OpenNode { f: h, h, y: start.y, x: start.x });
        g_score.insert(start, 0);

        while let Some(current) = open_set.pop_first() {
            let pos = Pos { y: current.y, x: current.x };
            if pos == goal {
                return reconstruct_path(&came_from, start, goal);
            }
            let Some(&current_g) = g_score.get(&pos) else {
                continue;
            };
            if current.f > current_g + current.h {
                // Superseded by a cheaper entry for the same cell.
                continue;
            }
            for (dx, dy, step) in NEIGHBOR_STEPS {
                let next = pos.offset(dx, dy);
                let cell_cost = self.cost_at(next);
                if cell_cost == 0 {
                    continue;
                }
                let tentative = current_g.saturating_add(cell_cost.saturating_mul(step));
                if tentative < *g_score.get(&next).unwrap_or(&u32::MAX) {
                    came_from.insert(next, pos);
                    g_score.insert(next, tentative);
                    let h = octile(next, goal);
                    let f = tentative.saturating_add(h);
                    open_set.insert(OpenNode { f, h, y: next.y, x: next.x });
                }
            }
        }
        Vec::new()
    }
}

/// Base walkability plus occupancy and corpse penalties, rebuilt per query.
pub fn build_cost_map(state: &GameState, request: &PathRequest) -> CostMap {
    let map = &state.map;
    let costs = map
        .positions()
        .map(|pos| {
            let known = match request.knowledge {
                Knowledge::Omniscient => true,
                Knowledge::Explored => map.is_explored(pos),
            };
            u32::from(known && map.is_walkable(pos))
        })
        .collect();
    let mut cost_map = CostMap { width: map.width, height: map.height, costs };

    for entity in state.entities() {
        let pos = entity.pos();
        if entity.blocks_movement() {
            cost_map.add(pos, request.block_cost);
        }
        match entity.liveness() {
            Some(liveness) if !liveness.alive => cost_map.add(pos, request.corpse_cost),
            Some(_) => {}
            None => trace!(entity = entity.name(), x = pos.x, y = pos.y, "corpse_cost_skipped"),
        }
    }
    cost_map
}

pub fn path_to(state: &GameState, request: &PathRequest) -> Vec<Pos> {
    build_cost_map(state, request).shortest_path(request.from, request.to)
}

pub fn chebyshev(a: Pos, b: Pos) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

/// Admissible for the 2/3 step weights since every passable cell costs at least 1.
fn octile(a: Pos, b: Pos) -> u32 {
    let dx = a.x.abs_diff(b.x);
    let dy = a.y.abs_diff(b.y);
    CARDINAL_STEP * dx.max(dy) + (DIAGONAL_STEP - CARDINAL_STEP) * dx.min(dy)
}

fn reconstruct_path(came_from: &BTreeMap<Pos, Pos>, start: Pos, goal: Pos) -> Vec<Pos> {
    let mut current = goal;
    let mut result = vec![current];
    while current != start {
        let Some(&previous) = came_from.get(&current) else {
            return Vec::new();
        };
        current = previous;
        result.push(current);
    }
    result.reverse();
    result.remove(0);
    result
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    h: u32,
    y: i32,
    x: i32,
}
