//! Entity templates, starter gear and loot weights.

use std::iter;

use crate::ailments::Ailments;
use crate::game::HostileAi;
use crate::state::{Actor, AiTuning, Fighter, Inventory, Item};
use crate::types::*;

/// Chance, in percent, that a rolled monster is the common kind.
pub const COMMON_HOSTILE_PERCENT: u32 = 80;

/// Base hp a Stim Stick restores before the tolerance penalty.
pub const STIM_HEAL_AMOUNT: i32 = 4;

pub const STARTER_GEAR: [ItemKind; 4] =
    [ItemKind::HandGun, ItemKind::SmallMagazine, ItemKind::StimStick, ItemKind::HandGrenade];

pub const STANDARD_LOOT_WEIGHTS: [(ItemKind, usize); 9] = [
    (ItemKind::StimStick, 30),
    (ItemKind::ZipGun, 15),
    (ItemKind::HandGrenade, 15),
    (ItemKind::ZipCannon, 5),
    (ItemKind::HomingGrenade, 7),
    (ItemKind::NitroglynGrenade, 3),
    (ItemKind::SmallMagazine, 20),
    (ItemKind::MediumMagazine, 4),
    (ItemKind::LargeMagazine, 1),
];

#[derive(Clone, Debug)]
pub struct ActorTemplate {
    pub kind: ActorKind,
    pub name: &'static str,
    pub glyph: Glyph,
    pub fighter: Fighter,
    pub tuning: AiTuning,
    pub hostile: bool,
    pub inventory_capacity: usize,
    pub hurt_sound: SoundCue,
    pub death_sound: SoundCue,
}

impl ActorTemplate {
    /// Builds a fresh actor; nothing is shared with previously built actors.
    pub fn build(&self, pos: Pos) -> Actor {
        Actor {
            id: EntityId::default(),
            kind: self.kind,
            name: self.name.to_string(),
            pos,
            glyph: self.glyph,
            fighter: self.fighter,
            tuning: self.tuning,
            ai: self.hostile.then(|| HostileAi::new(self.tuning, pos)),
            inventory: Inventory::with_capacity(self.inventory_capacity),
            ailments: Ailments::default(),
            hurt_sound: self.hurt_sound,
            death_sound: self.death_sound,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ItemTemplate {
    pub kind: ItemKind,
    pub name: &'static str,
    pub glyph: Glyph,
}

impl ItemTemplate {
    pub fn build(&self, pos: Pos) -> Item {
        Item {
            id: ItemId::default(),
            kind: self.kind,
            name: self.name.to_string(),
            pos,
            glyph: self.glyph,
        }
    }
}

const BLACK: Rgb = Rgb(0, 0, 0);

pub fn actor_template(kind: ActorKind) -> ActorTemplate {
    match kind {
        ActorKind::Player => ActorTemplate {
            kind,
            name: "Player",
            glyph: Glyph { ch: '@', fg: Rgb(255, 255, 255), bg: BLACK },
            fighter: Fighter { hp: 30, max_hp: 30, defense: 2, power: 5 },
            tuning: AiTuning { block_cost: 0, corpse_cost: 0 },
            hostile: false,
            inventory_capacity: 26,
            hurt_sound: SoundCue::PlayerHurt,
            death_sound: SoundCue::PlayerDead,
        },
        ActorKind::Infected => ActorTemplate {
            kind,
            name: "Infected",
            glyph: Glyph { ch: 'i', fg: Rgb(64, 64, 128), bg: BLACK },
            fighter: Fighter { hp: 10, max_hp: 10, defense: 0, power: 3 },
            tuning: AiTuning { block_cost: 10, corpse_cost: 3 },
            hostile: true,
            inventory_capacity: 0,
            hurt_sound: SoundCue::InfectedHurt,
            death_sound: SoundCue::InfectedDead,
        },
        ActorKind::InfectedBrute => ActorTemplate {
            kind,
            name: "Infected Brute",
            glyph: Glyph { ch: 'I', fg: Rgb(32, 32, 128), bg: BLACK },
            fighter: Fighter { hp: 16, max_hp: 16, defense: 1, power: 4 },
            tuning: AiTuning { block_cost: 30, corpse_cost: 15 },
            hostile: true,
            inventory_capacity: 0,
            hurt_sound: SoundCue::InfectedHurt,
            death_sound: SoundCue::InfectedDead,
        },
    }
}

pub fn item_template(kind: ItemKind) -> ItemTemplate {
    let (name, ch, fg) = match kind {
        ItemKind::StimStick => ("Stim Stick", '/', Rgb(127, 0, 255)),
        ItemKind::ZipGun => ("Zip Gun", 'l', Rgb(255, 255, 0)),
        ItemKind::ZipCannon => ("Zip Cannon", 'l', Rgb(255, 200, 0)),
        ItemKind::HandGrenade => ("Hand Grenade", '*', Rgb(255, 0, 100)),
        ItemKind::HomingGrenade => ("Homing Grenade", '*', Rgb(255, 255, 0)),
        ItemKind::NitroglynGrenade => ("NitroGlyn Grenade", '*', Rgb(100, 0, 255)),
        ItemKind::HandGun => ("SemiAuto HandGun", 'f', Rgb(70, 70, 200)),
        ItemKind::SmallMagazine => ("Small Magazine", ']', Rgb(230, 0, 0)),
        ItemKind::MediumMagazine => ("Medium Magazine", ']', Rgb(230, 230, 0)),
        ItemKind::LargeMagazine => ("Large Magazine", ')', Rgb(0, 230, 0)),
    };
    ItemTemplate { kind, name, glyph: Glyph { ch, fg, bg: BLACK } }
}

/// One entry per weight point, so a uniform pick honours the weights.
pub fn expanded_loot_table() -> Vec<ItemKind> {
    STANDARD_LOOT_WEIGHTS
        .iter()
        .flat_map(|&(kind, weight)| iter::repeat_n(kind, weight))
        .collect()
}
