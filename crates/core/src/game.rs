use std::hash::Hasher;
use std::mem;

use tracing::{debug, info};
use xxhash_rust::xxh3::Xxh3;

use crate::config::GameConfig;
use crate::content;
use crate::error::{ActionError, GenerationError};
use crate::mapgen::generate_dungeon;
use crate::rng::GameRng;
use crate::state::GameState;
use crate::tiles::TileKind;
use crate::types::*;

mod actions;
mod ai;
mod pathfinding;
#[cfg(test)]
pub(crate) mod test_support;
mod visibility;

pub use actions::ActorAction;
pub use ai::{AiState, HostileAi};
pub use pathfinding::{CostMap, Knowledge, PathRequest, build_cost_map, chebyshev, path_to};

use actions::ActionContext;

const PING_COLOR: Rgb = Rgb(255, 255, 230);
const PATH_PREVIEW_COLOR: Rgb = Rgb(255, 200, 200);

/// What the input layer can ask the player to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    /// Bump: attacks a living actor in the way, otherwise steps.
    Move { dx: i32, dy: i32 },
    Wait,
    Pickup,
    Drop { index: usize },
    Use { index: usize },
    /// One step along the fog-limited route to a cell; picks up when it is the player's own.
    TravelToward(Pos),
}

pub struct Game {
    seed: u64,
    turn: u64,
    rng: GameRng,
    state: GameState,
    fov_radius: i32,
    log: Vec<LogEvent>,
}

impl Game {
    pub fn new(seed: u64, config: &GameConfig) -> Result<Self, GenerationError> {
        let mut rng = GameRng::seed_from_u64(seed);
        let player = content::actor_template(ActorKind::Player).build(Pos::new(0, 0));
        let state = generate_dungeon(&config.generation, player, &mut rng)?;
        info!(seed, rooms = state.map.rooms().len(), "session_started");
        Ok(Self::assemble(seed, rng, state, config.fov_radius))
    }

    /// Wraps a hand-built level, for scenarios that need a fixed layout.
    pub fn with_state(seed: u64, state: GameState, fov_radius: i32) -> Self {
        Self::assemble(seed, GameRng::seed_from_u64(seed), state, fov_radius)
    }

    fn assemble(seed: u64, rng: GameRng, state: GameState, fov_radius: i32) -> Self {
        let mut game = Self { seed, turn: 0, rng, state, fov_radius, log: Vec::new() };
        game.update_fov();
        game
    }

    /// Runs the player's action and, when it succeeds, one round of hostile turns
    /// followed by a visibility refresh. A refused action costs no time.
    pub fn handle_player_action(&mut self, action: PlayerAction) -> Result<(), ActionError> {
        let result = self.resolve_player_action(action);
        if let Err(error) = &result {
            self.log.push(LogEvent::Message {
                text: error.to_string(),
                tone: MessageTone::Impossible,
            });
            self.log.push(LogEvent::Sound(SoundCue::Refused));
            return result;
        }

        self.turn += 1;
        self.handle_enemy_turns();
        self.update_fov();
        Ok(())
    }

    fn resolve_player_action(&mut self, action: PlayerAction) -> Result<(), ActionError> {
        if self.is_player_dead() {
            return Err(ActionError::ActorMissing);
        }
        let player_id = self.state.player_id;
        let actor_action = match action {
            PlayerAction::Move { dx, dy } => ActorAction::Bump { dx, dy },
            PlayerAction::Wait => ActorAction::Wait,
            PlayerAction::Pickup => ActorAction::Pickup,
            PlayerAction::Drop { index } => ActorAction::Drop { index },
            PlayerAction::Use { index } => ActorAction::Use { index },
            PlayerAction::TravelToward(destination) => self.travel_step(destination)?,
        };
        self.context().perform(player_id, actor_action)
    }

    fn travel_step(&mut self, destination: Pos) -> Result<ActorAction, ActionError> {
        let origin = self.player_pos();
        if destination == origin {
            return Ok(ActorAction::Pickup);
        }
        let path = self.preview_path(destination);
        let Some(&next) = path.first() else {
            return Err(ActionError::NoRouteToDestination);
        };
        self.log.extend(
            path.iter().map(|&pos| LogEvent::Highlight { pos, color: PATH_PREVIEW_COLOR }),
        );
        Ok(ActorAction::Bump { dx: next.x - origin.x, dy: next.y - origin.y })
    }

    /// Route the player would take to `destination` through explored cells only.
    pub fn preview_path(&self, destination: Pos) -> Vec<Pos> {
        let request = PathRequest::new(self.player_pos(), destination).fog_limited();
        path_to(&self.state, &request)
    }

    /// Every living hostile decides and acts in slot order, one complete turn
    /// at a time. Refused hostile actions are dropped silently.
    pub fn handle_enemy_turns(&mut self) {
        for actor_id in self.state.hostile_ids() {
            let Some(actor) = self.state.actors.get_mut(actor_id) else {
                continue;
            };
            if !actor.is_alive() {
                continue;
            }
            let Some(mut ai) = actor.ai.take() else {
                continue;
            };
            let decision = ai.take_turn(actor_id, &self.state, &mut self.rng);
            if let Some(actor) = self.state.actors.get_mut(actor_id) {
                actor.ai = Some(ai);
            }

            let Some(action) = decision else {
                continue;
            };
            if let Err(error) = self.context().perform(actor_id, action) {
                debug!(actor = ?actor_id, ?action, %error, "hostile_action_skipped");
            }
        }
    }

    /// Recomputes the player's field of view, then alerts on newly revealed hostiles.
    pub fn update_fov(&mut self) {
        let origin = self.state.player().pos;
        visibility::compute_fov(&mut self.state.map, origin, self.fov_radius);

        let mut any_pinged = false;
        for actor_id in self.state.hostile_ids() {
            let pos = self.state.actors[actor_id].pos;
            let visible = self.state.map.is_visible(pos);
            let Some(ai) = self.state.actors[actor_id].ai.as_mut() else {
                continue;
            };
            if ai.should_ping(visible) {
                any_pinged = true;
                self.log.push(LogEvent::Highlight { pos, color: PING_COLOR });
            }
        }
        if any_pinged {
            self.log.push(LogEvent::Sound(SoundCue::HostileSeen));
        }
    }

    fn context(&mut self) -> ActionContext<'_> {
        ActionContext { state: &mut self.state, rng: &mut self.rng, log: &mut self.log }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn player_pos(&self) -> Pos {
        self.state.player().pos
    }

    pub fn is_player_dead(&self) -> bool {
        !self.state.player().is_alive()
    }

    pub fn tile_at(&self, pos: Pos) -> TileKind {
        self.state.map.tile_at(pos)
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    /// Hands pending notifications to the presentation layer.
    pub fn drain_events(&mut self) -> Vec<LogEvent> {
        mem::take(&mut self.log)
    }

    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.turn);
        hasher.write_u64(self.state.fingerprint());
        for actor in self.state.actors.values() {
            let state_tag = match actor.ai.as_ref().map(HostileAi::state) {
                None => 0,
                Some(AiState::Idle) => 1,
                Some(AiState::Pursuing { .. }) => 2,
                Some(AiState::Searching { .. }) => 3,
                Some(AiState::Patrolling { .. }) => 4,
            };
            hasher.write_u8(state_tag);
            hasher.write_u8(actor.ailments.tolerance());
            hasher.write_u64(actor.inventory.items.len() as u64);
        }
        hasher.finish()
    }
}
