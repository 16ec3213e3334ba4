use std::hash::Hasher;

use slotmap::SlotMap;
use xxhash_rust::xxh3::Xxh3;

use crate::ailments::Ailments;
use crate::content::{ActorTemplate, ItemTemplate};
use crate::game::HostileAi;
use crate::mapgen::Room;
use crate::tiles::TileKind;
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fighter {
    pub hp: i32,
    pub max_hp: i32,
    pub defense: i32,
    pub power: i32,
}

impl Fighter {
    /// Restores up to `amount` hp without passing `max_hp`; returns what was restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if self.hp >= self.max_hp || amount <= 0 {
            return 0;
        }
        let healed = (self.hp + amount).min(self.max_hp);
        let recovered = healed - self.hp;
        self.hp = healed;
        recovered
    }
}

/// Cost biases an actor applies when it asks for a path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AiTuning {
    pub block_cost: u32,
    pub corpse_cost: u32,
}

#[derive(Clone, Debug)]
pub struct Inventory {
    pub capacity: usize,
    pub items: Vec<Item>,
}

impl Inventory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity, items: Vec::new() }
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }
}

#[derive(Clone, Debug)]
pub struct Actor {
    pub id: EntityId,
    pub kind: ActorKind,
    pub name: String,
    pub pos: Pos,
    pub glyph: Glyph,
    pub fighter: Fighter,
    pub tuning: AiTuning,
    pub ai: Option<HostileAi>,
    pub inventory: Inventory,
    pub ailments: Ailments,
    pub hurt_sound: SoundCue,
    pub death_sound: SoundCue,
}

impl Actor {
    pub fn is_alive(&self) -> bool {
        self.fighter.hp > 0
    }
}

#[derive(Clone, Debug)]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    pub name: String,
    pub pos: Pos,
    pub glyph: Glyph,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Liveness {
    pub alive: bool,
}

/// Capabilities shared by everything placed on the map.
pub trait Entity {
    fn pos(&self) -> Pos;
    fn name(&self) -> &str;
    fn blocks_movement(&self) -> bool;
    fn render_order(&self) -> RenderOrder;

    /// `None` for entities that were never alive and so can never become corpses.
    fn liveness(&self) -> Option<Liveness> {
        None
    }
}

impl Entity for Actor {
    fn pos(&self) -> Pos {
        self.pos
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn blocks_movement(&self) -> bool {
        self.is_alive()
    }

    fn render_order(&self) -> RenderOrder {
        if self.is_alive() { RenderOrder::Actor } else { RenderOrder::Corpse }
    }

    fn liveness(&self) -> Option<Liveness> {
        Some(Liveness { alive: self.is_alive() })
    }
}

impl Entity for Item {
    fn pos(&self) -> Pos {
        self.pos
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn blocks_movement(&self) -> bool {
        false
    }

    fn render_order(&self) -> RenderOrder {
        RenderOrder::Item
    }
}

#[derive(Clone)]
pub struct Map {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<TileKind>,
    pub visible: Vec<bool>,
    pub explored: Vec<bool>,
    rooms: Vec<Room>,
}

impl Map {
    /// Solid rock; generation carves floor out of it.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![TileKind::Wall; width * height],
            visible: vec![false; width * height],
            explored: vec![false; width * height],
            rooms: Vec::new(),
        }
    }

    pub fn tile_at(&self, pos: Pos) -> TileKind {
        if !self.in_bounds(pos) {
            return TileKind::Wall;
        }
        self.tiles[self.index(pos)]
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn set_tile(&mut self, pos: Pos, tile: TileKind) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.tiles[idx] = tile;
    }

    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.tile_at(pos).walkable()
    }

    pub fn is_transparent(&self, pos: Pos) -> bool {
        self.tile_at(pos).transparent()
    }

    pub fn is_visible(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.visible[self.index(pos)]
    }

    pub fn set_visible(&mut self, pos: Pos, visible: bool) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.visible[idx] = visible;
    }

    pub fn clear_visible(&mut self) {
        self.visible.fill(false);
    }

    pub fn is_explored(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.explored[self.index(pos)]
    }

    pub fn mark_explored(&mut self, pos: Pos) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.explored[idx] = true;
    }

    /// Rooms in generation order; the first one is the spawn room.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn spawn_room(&self) -> Option<&Room> {
        self.rooms.first()
    }

    pub(crate) fn attach_rooms(&mut self, rooms: Vec<Room>) {
        self.rooms = rooms;
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| Pos { y: y as i32, x: x as i32 })
        })
    }

    pub(crate) fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

pub struct GameState {
    pub map: Map,
    pub actors: SlotMap<EntityId, Actor>,
    pub items: SlotMap<ItemId, Item>,
    pub player_id: EntityId,
}

impl GameState {
    pub fn new(map: Map, player: Actor) -> Self {
        let mut actors = SlotMap::with_key();
        let player_id = actors.insert(player);
        actors[player_id].id = player_id;
        Self { map, actors, items: SlotMap::with_key(), player_id }
    }

    pub fn player(&self) -> &Actor {
        &self.actors[self.player_id]
    }

    pub fn player_mut(&mut self) -> &mut Actor {
        &mut self.actors[self.player_id]
    }

    pub fn spawn_actor(&mut self, template: &ActorTemplate, pos: Pos) -> EntityId {
        let id = self.actors.insert(template.build(pos));
        self.actors[id].id = id;
        id
    }

    pub fn spawn_item(&mut self, template: &ItemTemplate, pos: Pos) -> ItemId {
        self.place_item(template.build(pos), pos)
    }

    /// Takes ownership of `item` and puts it on the map at `pos` under a fresh id.
    pub fn place_item(&mut self, mut item: Item, pos: Pos) -> ItemId {
        item.pos = pos;
        let id = self.items.insert(item);
        self.items[id].id = id;
        id
    }

    pub fn remove_item(&mut self, id: ItemId) -> Option<Item> {
        self.items.remove(id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &dyn Entity> + '_ {
        self.actors
            .values()
            .map(|actor| actor as &dyn Entity)
            .chain(self.items.values().map(|item| item as &dyn Entity))
    }

    pub fn is_occupied(&self, pos: Pos) -> bool {
        self.entities().any(|entity| entity.pos() == pos)
    }

    pub fn blocking_entity_at(&self, pos: Pos) -> Option<EntityId> {
        self.actors
            .iter()
            .find(|(_, actor)| actor.blocks_movement() && actor.pos == pos)
            .map(|(id, _)| id)
    }

    pub fn living_actor_at(&self, pos: Pos) -> Option<EntityId> {
        self.actors
            .iter()
            .find(|(_, actor)| actor.is_alive() && actor.pos == pos)
            .map(|(id, _)| id)
    }

    pub fn item_at(&self, pos: Pos) -> Option<ItemId> {
        self.items.iter().find(|(_, item)| item.pos == pos).map(|(id, _)| id)
    }

    pub fn hostile_ids(&self) -> Vec<EntityId> {
        self.actors
            .iter()
            .filter(|(id, actor)| *id != self.player_id && actor.is_alive() && actor.ai.is_some())
            .map(|(id, _)| id)
            .collect()
    }

    /// Stable digest of the map and every placed entity.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.map.width as u64);
        hasher.write_u64(self.map.height as u64);
        for tile in &self.map.tiles {
            hasher.write_u8(tile.code());
        }
        for room in self.map.rooms() {
            hasher.write_i32(room.x1);
            hasher.write_i32(room.y1);
            hasher.write_i32(room.x2);
            hasher.write_i32(room.y2);
        }
        for actor in self.actors.values() {
            hasher.write_u8(actor.kind as u8);
            hasher.write_i32(actor.pos.x);
            hasher.write_i32(actor.pos.y);
            hasher.write_i32(actor.fighter.hp);
        }
        for item in self.items.values() {
            hasher.write_u8(item.kind as u8);
            hasher.write_i32(item.pos.x);
            hasher.write_i32(item.pos.y);
        }
        hasher.finish()
    }
}
