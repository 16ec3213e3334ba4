//! Action execution: movement, melee, item transfer and death.
//! This module exists so the player and hostiles share identical action rules.
//! It does not own decision making or turn ordering.

use tracing::debug;

use super::*;
use crate::ailments::AilmentNotice;
use crate::content::STIM_HEAL_AMOUNT;
use crate::error::ActionError;
use crate::mapgen::bleed;
use crate::rng::GameRng;
use crate::state::GameState;

const HIT_FLASH: Rgb = Rgb(255, 50, 50);
const CORPSE_COLOR: Rgb = Rgb(191, 0, 0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActorAction {
    Move { dx: i32, dy: i32 },
    Melee { dx: i32, dy: i32 },
    /// Melee when a living actor is in the way, otherwise move.
    Bump { dx: i32, dy: i32 },
    Wait,
    Pickup,
    Drop { index: usize },
    /// Consumes the inventory item at `index`; only Stim Sticks have an effect.
    Use { index: usize },
}

/// Mutable view an action runs against.
pub(super) struct ActionContext<'a> {
    pub(super) state: &'a mut GameState,
    pub(super) rng: &'a mut GameRng,
    pub(super) log: &'a mut Vec<LogEvent>,
}

impl ActionContext<'_> {
    /// Runs `action` for `actor_id`; ailments tick only when it succeeds.
    pub(super) fn perform(
        &mut self,
        actor_id: EntityId,
        action: ActorAction,
    ) -> Result<(), ActionError> {
        if !self.state.actors.contains_key(actor_id) {
            return Err(ActionError::ActorMissing);
        }
        match action {
            ActorAction::Move { dx, dy } => self.move_actor(actor_id, dx, dy)?,
            ActorAction::Melee { dx, dy } => self.melee(actor_id, dx, dy)?,
            ActorAction::Bump { dx, dy } => {
                let target = self.state.actors[actor_id].pos.offset(dx, dy);
                if self.state.living_actor_at(target).is_some_and(|id| id != actor_id) {
                    self.melee(actor_id, dx, dy)?;
                } else {
                    self.move_actor(actor_id, dx, dy)?;
                }
            }
            ActorAction::Wait => {}
            ActorAction::Pickup => self.pickup(actor_id)?,
            ActorAction::Drop { index } => self.drop_item(actor_id, index)?,
            ActorAction::Use { index } => self.use_item(actor_id, index)?,
        }
        self.tick_ailments(actor_id);
        Ok(())
    }

    fn message(&mut self, text: String, tone: MessageTone) {
        self.log.push(LogEvent::Message { text, tone });
    }

    fn move_actor(&mut self, actor_id: EntityId, dx: i32, dy: i32) -> Result<(), ActionError> {
        let actor = &self.state.actors[actor_id];
        let origin = actor.pos;
        let destination = origin.offset(dx, dy);
        if !self.state.map.in_bounds(destination)
            || !self.state.map.is_walkable(destination)
            || self.state.blocking_entity_at(destination).is_some()
        {
            return Err(ActionError::Blocked);
        }

        // Lower health means better odds of leaving a trail.
        let (hp, max_hp) = (actor.fighter.hp, actor.fighter.max_hp);
        if hp <= max_hp && 3 * self.rng.range_inclusive(hp, max_hp) < max_hp {
            bleed(&mut self.state.map, origin, 1, self.rng);
        }

        self.state.actors[actor_id].pos = destination;
        Ok(())
    }

    fn melee(&mut self, actor_id: EntityId, dx: i32, dy: i32) -> Result<(), ActionError> {
        let attacker = &self.state.actors[actor_id];
        let target_pos = attacker.pos.offset(dx, dy);
        let target_id = self
            .state
            .living_actor_at(target_pos)
            .filter(|&id| id != actor_id)
            .ok_or(ActionError::NothingToAttack)?;
        let target = &self.state.actors[target_id];

        let damage = attacker.fighter.power - target.fighter.defense;
        let description = format!("{} attacks {}", capitalize(&attacker.name), target.name);
        let tone = if actor_id == self.state.player_id {
            MessageTone::PlayerAttack
        } else {
            MessageTone::EnemyAttack
        };

        if damage <= 0 {
            let defense = target.fighter.defense;
            self.message(format!("{description} but does no damage. ({defense} defense)"), tone);
            return Ok(());
        }

        self.message(format!("{description} for {damage} damage."), tone);
        let target = &mut self.state.actors[target_id];
        target.fighter.hp -= damage;
        let fighter = target.fighter;
        self.log.push(LogEvent::Sound(target.hurt_sound));
        self.log.push(LogEvent::Highlight { pos: target_pos, color: HIT_FLASH });

        if fighter.max_hp <= damage * 3 || fighter.hp * 4 <= fighter.max_hp {
            bleed(&mut self.state.map, target_pos, 1, self.rng);
        }
        if fighter.hp <= 0 {
            self.kill(target_id);
        }
        Ok(())
    }

    /// Turns the actor into a non-blocking corpse in place.
    fn kill(&mut self, actor_id: EntityId) {
        let is_player = actor_id == self.state.player_id;
        let actor = &mut self.state.actors[actor_id];
        let (text, tone) = if is_player {
            ("You died!".to_string(), MessageTone::PlayerDied)
        } else {
            (format!("{} is dead!", actor.name), MessageTone::EnemyDied)
        };
        actor.glyph = Glyph { ch: '%', fg: CORPSE_COLOR, bg: actor.glyph.bg };
        actor.name = format!("remains of {}", actor.name);
        actor.ai = None;
        let death_sound = actor.death_sound;
        debug!(actor = ?actor_id, x = actor.pos.x, y = actor.pos.y, "actor_died");

        self.log.push(LogEvent::Sound(death_sound));
        self.message(text, tone);
    }

    fn pickup(&mut self, actor_id: EntityId) -> Result<(), ActionError> {
        let actor = &self.state.actors[actor_id];
        let item_id = self.state.item_at(actor.pos).ok_or(ActionError::NothingToPickUp)?;
        if actor.inventory.is_full() {
            return Err(ActionError::InventoryFull);
        }
        let item = self.state.remove_item(item_id).ok_or(ActionError::NothingToPickUp)?;
        let text = format!("You picked up the {}!", item.name);
        self.state.actors[actor_id].inventory.items.push(item);

        self.message(text, MessageTone::Neutral);
        self.log.push(LogEvent::Sound(SoundCue::ItemPickup));
        Ok(())
    }

    fn drop_item(&mut self, actor_id: EntityId, index: usize) -> Result<(), ActionError> {
        let actor = &mut self.state.actors[actor_id];
        if index >= actor.inventory.items.len() {
            return Err(ActionError::NotInInventory);
        }
        let item = actor.inventory.items.remove(index);
        let pos = actor.pos;
        let text = format!("You dropped the {}.", item.name);
        self.state.place_item(item, pos);
        self.message(text, MessageTone::Neutral);
        Ok(())
    }

    fn use_item(&mut self, actor_id: EntityId, index: usize) -> Result<(), ActionError> {
        let is_player = actor_id == self.state.player_id;
        let actor = &mut self.state.actors[actor_id];
        let kind = actor.inventory.items.get(index).ok_or(ActionError::NotInInventory)?.kind;
        if kind != ItemKind::StimStick {
            return Err(ActionError::NotUsable);
        }

        let recovered = actor.fighter.heal(STIM_HEAL_AMOUNT + actor.ailments.stim_modifier());
        if recovered <= 0 {
            return Err(ActionError::HealthFull);
        }
        let item = actor.inventory.items.remove(index);
        let notice = actor.ailments.gain_tolerance();
        let level = actor.ailments.level_label();

        self.message(
            format!("You use the {}, and recover {recovered} HP!", item.name),
            MessageTone::HealthRecovered,
        );
        self.log.push(LogEvent::Sound(SoundCue::StimStick));
        if is_player {
            let text = match notice {
                AilmentNotice::ToleranceMaxed => format!("Stimulant Stick tolerance maxed at {level}"),
                _ => format!("Stimulant Stick tolerance increased to {level}"),
            };
            self.message(text, MessageTone::ToleranceIncreased);
        }
        Ok(())
    }

    fn tick_ailments(&mut self, actor_id: EntityId) {
        let is_player = actor_id == self.state.player_id;
        let Some(actor) = self.state.actors.get_mut(actor_id) else {
            return;
        };
        if actor.ailments.tick() == Some(AilmentNotice::ToleranceFaded) && is_player {
            self.message(
                "Stimulant Stick tolerance has run its course".to_string(),
                MessageTone::ToleranceReduced,
            );
        }
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content;
    use crate::game::test_support::*;
    use crate::tiles::TileKind;

    fn run(
        state: &mut GameState,
        actor_id: EntityId,
        action: ActorAction,
    ) -> (Result<(), ActionError>, Vec<LogEvent>) {
        let mut rng = GameRng::seed_from_u64(17);
        let mut log = Vec::new();
        let result = ActionContext { state, rng: &mut rng, log: &mut log }.perform(actor_id, action);
        (result, log)
    }

    #[test]
    fn moving_into_wall_or_blocker_is_impossible() {
        let mut state = open_floor_state(6, 6, Pos::new(1, 1));
        let player = state.player_id;
        let (result, _) = run(&mut state, player, ActorAction::Move { dx: -1, dy: 0 });
        assert_eq!(result, Err(ActionError::Blocked));

        add_hostile(&mut state, ActorKind::Infected, Pos::new(2, 1));
        let (result, _) = run(&mut state, player, ActorAction::Move { dx: 1, dy: 0 });
        assert_eq!(result, Err(ActionError::Blocked));
        assert_eq!(state.player().pos, Pos::new(1, 1));
    }

    #[test]
    fn bump_moves_into_empty_cell() {
        let mut state = open_floor_state(6, 6, Pos::new(1, 1));
        let player = state.player_id;
        let (result, _) = run(&mut state, player, ActorAction::Bump { dx: 1, dy: 1 });
        assert_eq!(result, Ok(()));
        assert_eq!(state.player().pos, Pos::new(2, 2));
    }

    #[test]
    fn bump_attacks_living_actor_and_reports_damage() {
        let mut state = open_floor_state(6, 6, Pos::new(1, 1));
        let player = state.player_id;
        let hostile = add_hostile(&mut state, ActorKind::Infected, Pos::new(2, 1));

        let (result, log) = run(&mut state, player, ActorAction::Bump { dx: 1, dy: 0 });

        assert_eq!(result, Ok(()));
        assert_eq!(state.actors[hostile].fighter.hp, 5);
        assert!(log.contains(&LogEvent::Message {
            text: "Player attacks Infected for 5 damage.".to_string(),
            tone: MessageTone::PlayerAttack,
        }));
        assert!(log.contains(&LogEvent::Sound(SoundCue::InfectedHurt)));
    }

    #[test]
    fn melee_without_target_is_impossible() {
        let mut state = open_floor_state(6, 6, Pos::new(2, 2));
        let player = state.player_id;
        let (result, log) = run(&mut state, player, ActorAction::Melee { dx: 1, dy: 0 });
        assert_eq!(result, Err(ActionError::NothingToAttack));
        assert!(log.is_empty());
    }

    #[test]
    fn weak_attack_does_no_damage() {
        let mut state = open_floor_state(6, 6, Pos::new(1, 1));
        let hostile = add_hostile(&mut state, ActorKind::Infected, Pos::new(2, 1));
        state.player_mut().fighter.defense = 10;

        let (result, log) = run(&mut state, hostile, ActorAction::Melee { dx: -1, dy: 0 });

        assert_eq!(result, Ok(()));
        assert_eq!(state.player().fighter.hp, 30);
        assert!(matches!(
            log.as_slice(),
            [LogEvent::Message { tone: MessageTone::EnemyAttack, .. }]
        ));
    }

    #[test]
    fn lethal_hit_leaves_bloody_non_blocking_corpse() {
        let mut state = open_floor_state(6, 6, Pos::new(1, 1));
        let player = state.player_id;
        let hostile = add_hostile(&mut state, ActorKind::Infected, Pos::new(2, 1));
        state.actors[hostile].fighter.hp = 3;

        let (result, log) = run(&mut state, player, ActorAction::Melee { dx: 1, dy: 0 });

        assert_eq!(result, Ok(()));
        let corpse = &state.actors[hostile];
        assert!(!corpse.is_alive());
        assert!(corpse.ai.is_none());
        assert_eq!(corpse.name, "remains of Infected");
        assert_eq!(corpse.glyph.ch, '%');
        assert_eq!(state.blocking_entity_at(Pos::new(2, 1)), None);
        assert_eq!(state.map.tile_at(Pos::new(2, 1)), TileKind::BloodyFloor);
        assert!(log.contains(&LogEvent::Sound(SoundCue::InfectedDead)));
        assert!(state.hostile_ids().is_empty());
    }

    #[test]
    fn pickup_then_drop_moves_item_between_map_and_inventory() {
        let mut state = open_floor_state(6, 6, Pos::new(2, 2));
        let player = state.player_id;
        state.spawn_item(&content::item_template(ItemKind::ZipGun), Pos::new(2, 2));

        let (result, log) = run(&mut state, player, ActorAction::Pickup);
        assert_eq!(result, Ok(()));
        assert!(state.items.is_empty());
        assert_eq!(state.player().inventory.items.len(), 1);
        assert!(log.contains(&LogEvent::Sound(SoundCue::ItemPickup)));

        let (result, _) = run(&mut state, player, ActorAction::Pickup);
        assert_eq!(result, Err(ActionError::NothingToPickUp));

        let (result, _) = run(&mut state, player, ActorAction::Drop { index: 0 });
        assert_eq!(result, Ok(()));
        assert!(state.player().inventory.items.is_empty());
        let dropped = state.item_at(Pos::new(2, 2)).expect("dropped item");
        assert_eq!(state.items[dropped].kind, ItemKind::ZipGun);

        let (result, _) = run(&mut state, player, ActorAction::Drop { index: 0 });
        assert_eq!(result, Err(ActionError::NotInInventory));
    }

    #[test]
    fn full_inventory_refuses_pickup() {
        let mut state = open_floor_state(6, 6, Pos::new(2, 2));
        let player = state.player_id;
        state.player_mut().inventory.capacity = 0;
        state.spawn_item(&content::item_template(ItemKind::StimStick), Pos::new(2, 2));

        let (result, _) = run(&mut state, player, ActorAction::Pickup);
        assert_eq!(result, Err(ActionError::InventoryFull));
        assert_eq!(state.items.len(), 1);
    }

    #[test]
    fn failed_actions_do_not_tick_ailments() {
        let mut state = open_floor_state(6, 6, Pos::new(1, 1));
        let player = state.player_id;
        state.player_mut().ailments.gain_tolerance();
        let before = state.player().ailments.countdown();

        run(&mut state, player, ActorAction::Move { dx: -1, dy: 0 });
        assert_eq!(state.player().ailments.countdown(), before);

        run(&mut state, player, ActorAction::Wait);
        assert_eq!(state.player().ailments.countdown(), before - 1);
    }

    #[test]
    fn standing_still_never_attacks_self() {
        let mut state = open_floor_state(6, 6, Pos::new(2, 2));
        let player = state.player_id;
        let (result, _) = run(&mut state, player, ActorAction::Bump { dx: 0, dy: 0 });
        assert_eq!(result, Err(ActionError::Blocked));
        assert_eq!(state.player().fighter.hp, 30);
    }

    fn hurt_player_with_stims(count: usize) -> GameState {
        let mut state = open_floor_state(6, 6, Pos::new(2, 2));
        let stim = content::item_template(ItemKind::StimStick);
        for _ in 0..count {
            state.player_mut().inventory.items.push(stim.build(Pos::new(0, 0)));
        }
        state.player_mut().fighter.hp = 10;
        state
    }

    #[test]
    fn stim_heals_consumes_and_raises_tolerance() {
        let mut state = hurt_player_with_stims(1);
        let player = state.player_id;

        let (result, log) = run(&mut state, player, ActorAction::Use { index: 0 });

        assert_eq!(result, Ok(()));
        assert_eq!(state.player().fighter.hp, 14);
        assert!(state.player().inventory.items.is_empty());
        assert_eq!(state.player().ailments.tolerance(), 1);
        assert_eq!(state.player().ailments.countdown(), 19);
        assert_eq!(
            log,
            vec![
                LogEvent::Message {
                    text: "You use the Stim Stick, and recover 4 HP!".to_string(),
                    tone: MessageTone::HealthRecovered,
                },
                LogEvent::Sound(SoundCue::StimStick),
                LogEvent::Message {
                    text: "Stimulant Stick tolerance increased to Low".to_string(),
                    tone: MessageTone::ToleranceIncreased,
                },
            ]
        );
    }

    #[test]
    fn repeated_stims_heal_less_and_max_out_tolerance() {
        let mut state = hurt_player_with_stims(4);
        let player = state.player_id;
        let mut healed = Vec::new();
        let mut last_log = Vec::new();

        for _ in 0..4 {
            let before = state.player().fighter.hp;
            let (result, log) = run(&mut state, player, ActorAction::Use { index: 0 });
            assert_eq!(result, Ok(()));
            healed.push(state.player().fighter.hp - before);
            last_log = log;
        }

        assert_eq!(healed, vec![4, 3, 2, 1]);
        assert_eq!(state.player().ailments.level_label(), "High");
        assert!(last_log.contains(&LogEvent::Message {
            text: "Stimulant Stick tolerance maxed at High".to_string(),
            tone: MessageTone::ToleranceIncreased,
        }));
    }

    #[test]
    fn stim_at_full_health_is_refused_and_kept() {
        let mut state = hurt_player_with_stims(1);
        let player = state.player_id;
        state.player_mut().fighter.hp = 30;

        let (result, log) = run(&mut state, player, ActorAction::Use { index: 0 });

        assert_eq!(result, Err(ActionError::HealthFull));
        assert_eq!(result.unwrap_err().to_string(), "Your health is already full.");
        assert!(log.is_empty());
        assert_eq!(state.player().inventory.items.len(), 1);
        assert_eq!(state.player().ailments.tolerance(), 0);
    }

    #[test]
    fn only_stims_can_be_used() {
        let mut state = hurt_player_with_stims(0);
        let player = state.player_id;
        let gun = content::item_template(ItemKind::ZipGun).build(Pos::new(0, 0));
        state.player_mut().inventory.items.push(gun);

        let (result, _) = run(&mut state, player, ActorAction::Use { index: 0 });
        assert_eq!(result, Err(ActionError::NotUsable));
        let (result, _) = run(&mut state, player, ActorAction::Use { index: 3 });
        assert_eq!(result, Err(ActionError::NotInInventory));
    }

    #[test]
    fn stim_tolerance_runs_its_course_after_countdown() {
        let mut state = hurt_player_with_stims(1);
        let player = state.player_id;
        run(&mut state, player, ActorAction::Use { index: 0 });

        for _ in 0..19 {
            let (_, log) = run(&mut state, player, ActorAction::Wait);
            assert!(log.is_empty());
        }
        assert_eq!(state.player().ailments.tolerance(), 1);

        let (_, log) = run(&mut state, player, ActorAction::Wait);

        assert_eq!(state.player().ailments.tolerance(), 0);
        assert_eq!(
            log,
            vec![LogEvent::Message {
                text: "Stimulant Stick tolerance has run its course".to_string(),
                tone: MessageTone::ToleranceReduced,
            }]
        );
    }

    #[test]
    fn capitalize_lowers_the_tail() {
        assert_eq!(capitalize("remains of Infected"), "Remains of infected");
        assert_eq!(capitalize(""), "");
    }
}
