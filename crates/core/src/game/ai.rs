//! Hostile decision making: pursuit, last-seen search, patrol and idling.
//! This module exists so each hostile's turn is a pure decision over shared state.
//! It does not own action execution or the field-of-view sweep that feeds it.

use std::collections::VecDeque;
use std::mem;

use tracing::debug;

use super::*;
use super::actions::ActorAction;
use super::pathfinding::{PathRequest, chebyshev, path_to};
use crate::rng::GameRng;
use crate::state::{AiTuning, GameState};

/// Exclusive bound: a room whose center is exactly this far away is skipped.
const PATROL_RADIUS: i32 = 10;
const PATROL_ATTEMPTS: usize = 100;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AiState {
    /// Nothing to follow.
    #[default]
    Idle,
    /// Saw the player; the path leads to where they were last seen.
    Pursuing { path: VecDeque<Pos> },
    /// Lost the player and is walking the projected escape direction.
    Searching { target: Pos, path: VecDeque<Pos> },
    Patrolling { destination: Pos, path: VecDeque<Pos> },
}

impl AiState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pursuing { .. } => "pursuing",
            Self::Searching { .. } => "searching",
            Self::Patrolling { .. } => "patrolling",
        }
    }

    pub fn path(&self) -> Option<&VecDeque<Pos>> {
        match self {
            Self::Idle => None,
            Self::Pursuing { path } | Self::Searching { path, .. } | Self::Patrolling { path, .. } => {
                Some(path)
            }
        }
    }

    fn path_mut(&mut self) -> Option<&mut VecDeque<Pos>> {
        match self {
            Self::Idle => None,
            Self::Pursuing { path } | Self::Searching { path, .. } | Self::Patrolling { path, .. } => {
                Some(path)
            }
        }
    }

    fn take_path(&mut self) -> VecDeque<Pos> {
        self.path_mut().map(mem::take).unwrap_or_default()
    }

    fn has_path(&self) -> bool {
        self.path().is_some_and(|path| !path.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostileAi {
    state: AiState,
    tuning: AiTuning,
    last_position: Pos,
    just_seen: bool,
}

impl HostileAi {
    pub fn new(tuning: AiTuning, spawn: Pos) -> Self {
        Self { state: AiState::Idle, tuning, last_position: spawn, just_seen: false }
    }

    pub fn state(&self) -> &AiState {
        &self.state
    }

    pub fn tuning(&self) -> AiTuning {
        self.tuning
    }

    pub fn has_seen_player(&self) -> bool {
        matches!(self.state, AiState::Pursuing { .. })
    }

    /// True only on the first sweep in which the actor's cell became visible.
    pub fn should_ping(&mut self, visible: bool) -> bool {
        if !visible {
            self.just_seen = false;
            return false;
        }
        let first_sighting = !self.just_seen;
        self.just_seen = true;
        first_sighting
    }

    /// Decides this actor's action. `None` means the actor gives up its turn
    /// without acting at all.
    pub fn take_turn(
        &mut self,
        actor_id: EntityId,
        state: &GameState,
        rng: &mut GameRng,
    ) -> Option<ActorAction> {
        let pos = state.actors.get(actor_id)?.pos;
        let target = state.player().pos;

        if state.map.is_visible(pos) {
            let kept = self.state.take_path();
            self.transition(actor_id, AiState::Pursuing { path: kept });
            let dx = target.x - pos.x;
            let dy = target.y - pos.y;
            if chebyshev(pos, target) <= 1 {
                return Some(ActorAction::Melee { dx, dy });
            }
            let path = self.route(state, pos, target);
            self.transition(actor_id, AiState::Pursuing { path });
        }

        if self.has_seen_player() && !self.state.has_path() {
            let dx = pos.x - self.last_position.x;
            let dy = pos.y - self.last_position.y;
            if (dx, dy) == (0, 0) {
                self.transition(actor_id, AiState::Idle);
                return None;
            }
            let projected = project_until_wall(state, pos, dx, dy);
            if projected == pos {
                self.transition(actor_id, AiState::Idle);
            } else {
                let path = self.route(state, pos, projected);
                self.transition(actor_id, AiState::Searching { target: projected, path });
            }
        }

        if let Some(next) = self.state.path_mut().and_then(VecDeque::pop_front) {
            self.last_position = pos;
            return Some(ActorAction::Move { dx: next.x - pos.x, dy: next.y - pos.y });
        }

        self.try_patrol(actor_id, state, pos, rng);
        Some(ActorAction::Wait)
    }

    fn route(&self, state: &GameState, from: Pos, to: Pos) -> VecDeque<Pos> {
        path_to(state, &PathRequest::new(from, to).with_tuning(self.tuning)).into()
    }

    /// Adopts a path toward a nearby non-spawn room; the actor waits this turn.
    fn try_patrol(&mut self, actor_id: EntityId, state: &GameState, pos: Pos, rng: &mut GameRng) {
        let rooms = state.map.rooms();
        let spawn_room = state.map.spawn_room();
        for _ in 0..PATROL_ATTEMPTS {
            let Some(room) = rng.pick(rooms) else {
                break;
            };
            let destination = room.center();
            if Some(room) == spawn_room || chebyshev(pos, destination) >= PATROL_RADIUS {
                continue;
            }
            let path = self.route(state, pos, destination);
            if !path.is_empty() {
                self.transition(actor_id, AiState::Patrolling { destination, path });
                return;
            }
        }
        self.transition(actor_id, AiState::Idle);
    }

    fn transition(&mut self, actor_id: EntityId, next: AiState) {
        if self.state.label() != next.label() {
            debug!(actor = ?actor_id, from = self.state.label(), to = next.label(), "ai_state_changed");
        }
        self.state = next;
    }
}

/// Last walkable cell when stepping from `from` by (`dx`, `dy`) until a wall.
fn project_until_wall(state: &GameState, from: Pos, dx: i32, dy: i32) -> Pos {
    let mut probe = from;
    while state.map.is_walkable(probe) {
        probe = probe.offset(dx, dy);
    }
    probe.offset(-dx, -dy)
}
